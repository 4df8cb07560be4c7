//! Error types for the registry.

use docuchain_core::{CoreError, DocumentError, ErrorCode};
use docuchain_store::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
///
/// Only [`RegistryError::Document`] is a rule violation with a numeric code;
/// the others are infrastructure failures the host must surface differently.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A precondition of the operation was violated.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A signed call failed authentication or could not be encoded.
    #[error("authentication error: {0}")]
    Authentication(#[from] CoreError),
}

impl RegistryError {
    /// The numeric code, if this is a rule violation.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            RegistryError::Document(e) => Some(e.code()),
            _ => None,
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
