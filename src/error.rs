//! # Error Module
//!
//! Error kinds surfaced by the log store. Backend errors are wrapped in the
//! kind matching the operation that produced them and are otherwise passed
//! through untouched; nothing in this crate retries or recovers.

use thiserror::Error;

/// Errors returned by [`crate::store::LogStore`] implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached, timed out, or failed to initialize
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// The configured collection is not a usable table name
    #[error("invalid collection name: '{0}'")]
    InvalidCollection(String),

    /// An insert or delete was rejected by the backend
    #[error("write error: {0}")]
    Write(#[source] sqlx::Error),

    /// A find could not be executed or its rows could not be decoded
    #[error("query error: {0}")]
    Query(#[source] sqlx::Error),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
