//! # Store Module
//!
//! The [`LogStore`] trait is the surface the logging service talks to. Two
//! backends implement it:
//!
//! - [`SqliteLogStore`]: persistent store on an sqlx SQLite pool
//! - [`MemoryLogStore`]: process-local store, filters with [`crate::query::Predicate::compile`]
//!
//! Both translate criteria through [`crate::query::translate_with`], so a
//! given criteria value selects the same entries regardless of backend.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryLogStore;
pub use sqlite::SqliteLogStore;

use crate::error::Result;
use crate::models::{LogEntry, MatchCriteria};
use std::future::Future;

/// Persistence operations for log entries.
///
/// Implementations must be safe to call concurrently from many tasks.
pub trait LogStore: Send + Sync {
    /// Persist one entry
    fn add(&self, entry: &LogEntry) -> impl Future<Output = Result<()>> + Send;

    /// Return entries matching `criteria`, capped at `criteria.limit` when positive.
    /// No match is an empty vector, not an error.
    fn find(&self, criteria: &MatchCriteria) -> impl Future<Output = Result<Vec<LogEntry>>> + Send;

    /// Delete every entry matching `criteria` and return how many were deleted.
    ///
    /// Unrestricted criteria deletes the whole collection.
    fn remove(&self, criteria: &MatchCriteria) -> impl Future<Output = Result<u64>> + Send;

    /// Delete everything, best effort. Failures are logged, never returned.
    fn reset(&self) -> impl Future<Output = ()> + Send;

    /// Release backend resources. Safe to call more than once.
    fn close(&self) -> impl Future<Output = ()> + Send;
}
