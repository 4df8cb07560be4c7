//! Error types for the store module.

use docuchain_core::{CoreError, DocumentHash};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record encoding/decoding error.
    #[error("serialization error: {0}")]
    Serialization(#[from] CoreError),

    /// Update targeted a hash with no stored record.
    #[error("document not found: {0}")]
    NotFound(DocumentHash),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Blocking task failed or the connection lock was poisoned.
    #[error("task error: {0}")]
    Task(String),

    /// Concurrent writers kept changing the record.
    #[error("document {0} kept changing under concurrent writers")]
    Conflict(DocumentHash),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
