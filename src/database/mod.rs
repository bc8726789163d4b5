//!
//! # Database Module for logvault
//!
//! This module owns the SQLite connection pool that backs the log store and
//! keeps the collection table's schema current.
//!
//! ## Features
//!
//! - **Pool Creation**: Builds the sqlx pool with WAL journaling, busy timeout and REGEXP support.
//! - **Collection Tables**: Every migration is rendered for a named collection table.
//! - **Migration Control**: Tracks applied migrations per collection in a `migrations` table.
//!
//! ## Migration System
//!
//! Migrations are stored in code as `Migration` structs. The store applies
//! pending ones when it connects; the CLI can list and apply them by hand.

pub mod queries;

use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, warn};

pub const LOGVAULT_DB_URL: &str = "sqlite://logvault.db";
pub const DEFAULT_COLLECTION: &str = "logs";

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Database manager that handles pool creation and migrations for one collection
pub struct DatabaseManager {
    pool: SqlitePool,
    collection: String,
}

/// Represents a database migration with version and SQL
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub name: String,
    pub sql: String,
}

/// Connection settings for building the pool
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub socket_timeout: Duration,
}

impl DatabaseManager {
    /// Create a new manager around an existing pool.
    /// `collection` must already satisfy [`is_valid_collection_name`].
    pub fn new(pool: SqlitePool, collection: impl Into<String>) -> Self {
        Self {
            pool,
            collection: collection.into(),
        }
    }

    /// Open the pool described by `settings`, creating the database file if needed
    pub async fn connect(settings: &PoolSettings) -> Result<SqlitePool, sqlx::Error> {
        info!("Opening log database at {}", settings.database_url);

        let options = SqliteConnectOptions::from_str(&settings.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(settings.socket_timeout)
            .with_regexp();

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.connect_timeout)
            .connect_with(options)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(pool)
    }

    /// Initialize the database by creating the migrations table if needed
    pub async fn initialize(&self) -> Result<(), sqlx::Error> {
        self.create_migrations_table().await?;
        let (_applied, pending) = self.migration_status().await?;
        if !pending.is_empty() {
            warn!(
                "Pending migrations for collection '{}': {:?}",
                self.collection, pending
            );
        } else {
            info!("No pending migrations for collection '{}'", self.collection);
        }
        Ok(())
    }

    /// Create the migrations tracking table
    async fn create_migrations_table(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS migrations (
                collection TEXT NOT NULL,
                version INTEGER NOT NULL,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (collection, version)
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get all available migrations in order, rendered for this collection
    fn get_migrations(&self) -> Vec<Migration> {
        let table = &self.collection;
        vec![
            Migration {
                version: 1,
                name: "initial_schema".to_string(),
                sql: format!(
                    r#"
                    CREATE TABLE IF NOT EXISTS "{table}" (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        "message" TEXT NOT NULL DEFAULT '',
                        "logLevel" TEXT NOT NULL DEFAULT '',
                        "originService" TEXT NOT NULL DEFAULT '',
                        "labels" TEXT NOT NULL DEFAULT '[]',
                        "created" INTEGER NOT NULL DEFAULT 0,
                        "modified" INTEGER NOT NULL DEFAULT 0,
                        "args" TEXT NOT NULL DEFAULT '[]'
                    );
                "#
                ),
            },
            Migration {
                version: 2,
                name: "query_indexes".to_string(),
                sql: format!(
                    r#"
                    CREATE INDEX IF NOT EXISTS "idx_{table}_created" ON "{table}"("created");
                    CREATE INDEX IF NOT EXISTS "idx_{table}_log_level" ON "{table}"("logLevel");
                    CREATE INDEX IF NOT EXISTS "idx_{table}_origin_service" ON "{table}"("originService");
                "#
                ),
            },
        ]
    }

    /// Get applied migrations as a map (version -> name)
    async fn get_applied_migrations(&self) -> Result<HashMap<u32, String>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT version, name FROM migrations WHERE collection = ? ORDER BY version",
        )
        .bind(&self.collection)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| Ok((row.try_get::<u32, _>("version")?, row.try_get::<String, _>("name")?)))
            .collect()
    }

    /// Check migration status: returns (applied, pending) versions
    pub async fn migration_status(&self) -> Result<(Vec<u32>, Vec<u32>), sqlx::Error> {
        let all_migrations = self.get_migrations();
        let applied_migrations = self.get_applied_migrations().await?;
        let mut applied = Vec::new();
        let mut pending = Vec::new();

        for migration in all_migrations {
            if applied_migrations.contains_key(&migration.version) {
                applied.push(migration.version);
            } else {
                pending.push(migration.version);
            }
        }

        applied.sort();
        pending.sort();
        Ok((applied, pending))
    }

    /// Apply all pending migrations in order
    pub async fn apply_pending_migrations(&self) -> Result<(), sqlx::Error> {
        self.create_migrations_table().await?;
        let applied_migrations = self.get_applied_migrations().await?;

        for migration in self.get_migrations() {
            if !applied_migrations.contains_key(&migration.version) {
                self.run_migration(&migration).await?;
            }
        }
        Ok(())
    }

    /// Apply a specific migration by version (for manual control)
    pub async fn apply_migration(&self, version: u32) -> Result<(), MigrationError> {
        let migration = self
            .get_migrations()
            .into_iter()
            .find(|m| m.version == version)
            .ok_or(MigrationError::UnknownVersion(version))?;

        let applied_migrations = self.get_applied_migrations().await?;
        if applied_migrations.contains_key(&version) {
            return Err(MigrationError::AlreadyApplied(version));
        }

        self.run_migration(&migration).await?;
        Ok(())
    }

    /// Run one migration and record it, atomically
    async fn run_migration(&self, migration: &Migration) -> Result<(), sqlx::Error> {
        info!(
            "Applying migration {} ({}) to collection '{}'",
            migration.version, migration.name, self.collection
        );
        let mut tx = self.pool.begin().await?;
        sqlx::query(&migration.sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to apply migration {}: {}", migration.version, e);
                e
            })?;
        sqlx::query("INSERT INTO migrations (collection, version, name) VALUES (?, ?, ?)")
            .bind(&self.collection)
            .bind(migration.version)
            .bind(&migration.name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!("Applied migration {}: {}", migration.version, migration.name);
        Ok(())
    }

    /// Get the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

/// Errors from applying a single migration by version
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("migration version {0} not found")]
    UnknownVersion(u32),
    #[error("migration {0} already applied")]
    AlreadyApplied(u32),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// A collection name is interpolated into SQL, so only plain identifiers are accepted
pub fn is_valid_collection_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
