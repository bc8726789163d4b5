//! Store-level tests shared by every backend.
//!
//! Each check runs against both [`MemoryLogStore`] and [`SqliteLogStore`] so
//! the in-memory predicate evaluation and the rendered SQL are held to the
//! same results.

mod criteria_tests;

use crate::env::StoreConfig;
use crate::models::{LogEntry, MatchCriteria};
use crate::store::{LogStore, MemoryLogStore, SqliteLogStore};
use tempfile::TempDir;

/// Open a file-backed store in `dir`
pub(crate) async fn sqlite_store(dir: &TempDir) -> SqliteLogStore {
    let config = StoreConfig {
        database_url: format!("sqlite://{}", dir.path().join("store.db").display()),
        ..StoreConfig::default()
    };
    SqliteLogStore::connect(&config)
        .await
        .expect("store should open in a temp dir")
}

pub(crate) fn memory_store() -> MemoryLogStore {
    MemoryLogStore::default()
}

/// Four entries covering every filterable field
pub(crate) fn fixture() -> Vec<LogEntry> {
    vec![
        LogEntry::new("ERROR", "disk full on /var")
            .with_origin_service("svc-a")
            .with_label("storage")
            .with_label("disk")
            .with_created(1000),
        LogEntry::new("WARN", "connection reset by peer")
            .with_origin_service("svc-b")
            .with_label("network")
            .with_created(2000),
        LogEntry::new("INFO", "user logged in")
            .with_origin_service("svc-a")
            .with_created(3000),
        LogEntry::new("ERROR", "replica lag above threshold")
            .with_origin_service("svc-c")
            .with_label("network")
            .with_label("storage")
            .with_created(4000),
    ]
}

pub(crate) async fn seed<S: LogStore>(store: &S) {
    for entry in fixture() {
        store.add(&entry).await.expect("seed insert");
    }
}

/// `created` values of the matching entries, sorted
pub(crate) async fn created_of<S: LogStore>(store: &S, criteria: &MatchCriteria) -> Vec<i64> {
    let mut created: Vec<i64> = store
        .find(criteria)
        .await
        .expect("find should succeed")
        .iter()
        .map(|entry| entry.created)
        .collect();
    created.sort_unstable();
    created
}
