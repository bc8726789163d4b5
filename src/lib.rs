//! # logvault
//!
//! Data-access layer for a centralized log-entry store. Services hand over
//! [`LogEntry`] values; callers search and delete them with [`MatchCriteria`].
//!
//! Criteria are translated once into a backend-neutral [`query::Predicate`]
//! and then either rendered to SQL ([`store::SqliteLogStore`]) or evaluated
//! in memory ([`store::MemoryLogStore`]).
//!
//! ```rust,no_run
//! use logvault::{LogEntry, LogStore, MatchCriteria, SqliteLogStore, StoreConfig};
//!
//! # async fn run() -> logvault::Result<()> {
//! let store = SqliteLogStore::connect(&StoreConfig::default()).await?;
//! store
//!     .add(&LogEntry::new("ERROR", "disk full").with_origin_service("svc-a"))
//!     .await?;
//!
//! let errors = store
//!     .find(&MatchCriteria::new().with_log_level("ERROR").with_limit(20))
//!     .await?;
//! println!("{} errors", errors.len());
//! store.close().await;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod database;
pub mod env;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod store;

pub use env::StoreConfig;
pub use error::{Result, StoreError};
pub use models::{LogEntry, MatchCriteria};
pub use store::{LogStore, MemoryLogStore, SqliteLogStore};

#[cfg(test)]
mod tests;
