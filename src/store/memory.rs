//! In-process log store.
//!
//! Keeps entries in insertion order and filters them with the same
//! predicate tree the SQLite store renders to SQL, compiled once per call.

use super::LogStore;
use crate::error::Result;
use crate::models::{LogEntry, MatchCriteria};
use crate::query::{KeywordMatch, translate_with};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct MemoryLogStore {
    entries: RwLock<Vec<LogEntry>>,
    keyword_match: KeywordMatch,
}

impl MemoryLogStore {
    pub fn new(keyword_match: KeywordMatch) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            keyword_match,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl LogStore for MemoryLogStore {
    async fn add(&self, entry: &LogEntry) -> Result<()> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn find(&self, criteria: &MatchCriteria) -> Result<Vec<LogEntry>> {
        let predicate = translate_with(criteria, self.keyword_match);
        let filter = predicate.compile();
        let limit = criteria
            .effective_limit()
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));

        let entries = self.entries.read().await;
        let found: Vec<LogEntry> = entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .take(limit)
            .cloned()
            .collect();
        debug!("Found {} log entries in memory", found.len());
        Ok(found)
    }

    async fn remove(&self, criteria: &MatchCriteria) -> Result<u64> {
        let predicate = translate_with(criteria, self.keyword_match);
        let filter = predicate.compile();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|entry| !filter.matches(entry));
        Ok((before - entries.len()) as u64)
    }

    async fn reset(&self) {
        self.entries.write().await.clear();
    }

    async fn close(&self) {}
}
