//! SQLite-backed log store.
//!
//! One long-lived pool is shared by every call. Each operation checks a
//! connection out for exactly its own duration; the `PoolConnection` guard
//! hands it back when dropped, whether the call returns normally, bails out
//! through `?`, or is cancelled mid-await.

use super::LogStore;
use crate::database::{self, DatabaseManager, PoolSettings, queries};
use crate::env::StoreConfig;
use crate::error::{Result, StoreError};
use crate::models::{LogEntry, MatchCriteria};
use crate::query::{KeywordMatch, translate_with};
use sqlx::sqlite::SqlitePool;
use tracing::{debug, info, warn};

pub struct SqliteLogStore {
    pool: SqlitePool,
    collection: String,
    keyword_match: KeywordMatch,
}

impl SqliteLogStore {
    /// Open the database described by `config` and bring the collection schema up to date
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        if !database::is_valid_collection_name(&config.collection) {
            return Err(StoreError::InvalidCollection(config.collection.clone()));
        }

        let settings = PoolSettings {
            database_url: config.database_url.clone(),
            max_connections: config.max_connections,
            connect_timeout: config.connect_timeout(),
            socket_timeout: config.socket_timeout(),
        };

        let pool = tokio::time::timeout(
            settings.connect_timeout,
            DatabaseManager::connect(&settings),
        )
        .await
        .map_err(|_| StoreError::Connection(sqlx::Error::PoolTimedOut))?
        .map_err(StoreError::Connection)?;

        let manager = DatabaseManager::new(pool, config.collection.clone());
        if let Err(e) = manager.apply_pending_migrations().await {
            manager.pool().close().await;
            return Err(StoreError::Connection(e));
        }

        info!(
            "Log store ready: collection '{}', keyword matching '{}'",
            config.collection, config.keyword_match
        );
        Ok(Self::from_pool(
            manager.pool().clone(),
            config.collection.clone(),
            config.keyword_match,
        ))
    }

    /// Wrap an already prepared pool whose collection table exists
    pub fn from_pool(
        pool: SqlitePool,
        collection: impl Into<String>,
        keyword_match: KeywordMatch,
    ) -> Self {
        Self {
            pool,
            collection: collection.into(),
            keyword_match,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Number of entries currently stored
    pub async fn count(&self) -> Result<i64> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::Query)?;
        queries::count_log_entries(&mut conn, &self.collection)
            .await
            .map_err(StoreError::Query)
    }
}

impl LogStore for SqliteLogStore {
    async fn add(&self, entry: &LogEntry) -> Result<()> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::Write)?;
        queries::insert_log_entry(&mut conn, &self.collection, entry)
            .await
            .map_err(StoreError::Write)?;
        debug!(
            origin_service = %entry.origin_service,
            level = %entry.level,
            "Stored log entry"
        );
        Ok(())
    }

    async fn find(&self, criteria: &MatchCriteria) -> Result<Vec<LogEntry>> {
        let predicate = translate_with(criteria, self.keyword_match);
        let mut conn = self.pool.acquire().await.map_err(StoreError::Query)?;
        let entries = queries::fetch_log_entries(
            &mut conn,
            &self.collection,
            &predicate,
            criteria.effective_limit(),
        )
        .await
        .map_err(StoreError::Query)?;
        debug!("Found {} log entries", entries.len());
        Ok(entries)
    }

    async fn remove(&self, criteria: &MatchCriteria) -> Result<u64> {
        let predicate = translate_with(criteria, self.keyword_match);
        let mut conn = self.pool.acquire().await.map_err(StoreError::Write)?;
        let removed = queries::delete_log_entries(&mut conn, &self.collection, &predicate)
            .await
            .map_err(StoreError::Write)?;
        if predicate.is_match_all() {
            info!("Removed all {} entries from '{}'", removed, self.collection);
        } else {
            debug!("Removed {} log entries", removed);
        }
        Ok(removed)
    }

    async fn reset(&self) {
        let mut conn = match self.pool.acquire().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Reset skipped, no connection available: {}", e);
                return;
            }
        };
        match queries::delete_all_log_entries(&mut conn, &self.collection).await {
            Ok(removed) => info!("Reset '{}': {} entries deleted", self.collection, removed),
            Err(e) => warn!("Reset of '{}' failed: {}", self.collection, e),
        }
    }

    async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        self.pool.close().await;
        info!("Log store closed");
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> StoreConfig {
        StoreConfig {
            database_url: format!("sqlite://{}", dir.path().join("logs.db").display()),
            ..StoreConfig::default()
        }
    }

    #[tokio::test]
    async fn test_connect_creates_database_and_collection() {
        let dir = TempDir::new().unwrap();
        let store = SqliteLogStore::connect(&test_config(&dir)).await.unwrap();
        assert_eq!(store.collection(), "logs");
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(dir.path().join("logs.db").exists());
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_collection() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            collection: "logs; DROP TABLE migrations".to_string(),
            ..test_config(&dir)
        };
        let result = SqliteLogStore::connect(&config).await;
        assert!(matches!(result, Err(StoreError::InvalidCollection(_))));
    }

    #[tokio::test]
    async fn test_connect_fails_for_unreachable_database() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            database_url: format!(
                "sqlite://{}",
                dir.path().join("missing").join("dir").join("logs.db").display()
            ),
            ..StoreConfig::default()
        };
        let result = SqliteLogStore::connect(&config).await;
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }

    #[tokio::test]
    async fn test_reconnect_keeps_existing_entries() {
        let dir = TempDir::new().unwrap();
        let store = SqliteLogStore::connect(&test_config(&dir)).await.unwrap();
        store.add(&LogEntry::new("INFO", "persisted")).await.unwrap();
        store.close().await;

        let store = SqliteLogStore::connect(&test_config(&dir)).await.unwrap();
        let found = store.find(&MatchCriteria::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "persisted");
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = SqliteLogStore::connect(&test_config(&dir)).await.unwrap();
        store.close().await;
        assert!(store.is_closed());
        store.close().await;
        assert!(store.is_closed());
    }

    #[tokio::test]
    async fn test_operations_after_close_report_their_kind() {
        let dir = TempDir::new().unwrap();
        let store = SqliteLogStore::connect(&test_config(&dir)).await.unwrap();
        store.close().await;

        let add = store.add(&LogEntry::new("INFO", "late")).await;
        assert!(matches!(add, Err(StoreError::Write(_))));

        let find = store.find(&MatchCriteria::default()).await;
        assert!(matches!(find, Err(StoreError::Query(_))));

        let remove = store.remove(&MatchCriteria::default()).await;
        assert!(matches!(remove, Err(StoreError::Write(_))));

        // reset swallows the failure
        store.reset().await;
    }

    #[tokio::test]
    async fn test_invalid_keyword_pattern_selects_nothing() {
        let dir = TempDir::new().unwrap();
        let store = SqliteLogStore::connect(&test_config(&dir)).await.unwrap();
        store.add(&LogEntry::new("INFO", "anything")).await.unwrap();

        let found = store
            .find(&MatchCriteria::new().with_keyword("(unclosed"))
            .await
            .unwrap();
        assert!(found.is_empty());

        let removed = store
            .remove(&MatchCriteria::new().with_keyword("(unclosed"))
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_literal_keyword_mode() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            keyword_match: KeywordMatch::Literal,
            ..test_config(&dir)
        };
        let store = SqliteLogStore::connect(&config).await.unwrap();
        store.add(&LogEntry::new("INFO", "a.c")).await.unwrap();
        store.add(&LogEntry::new("INFO", "abc")).await.unwrap();
        store.add(&LogEntry::new("INFO", "got (unclosed")).await.unwrap();

        let found = store.find(&MatchCriteria::new().with_keyword("a.c")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "a.c");

        let found = store
            .find(&MatchCriteria::new().with_keyword("(unclosed"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
