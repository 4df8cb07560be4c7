//! Error types for Docuchain Core.

use thiserror::Error;

use crate::types::{BlockHeight, DocumentHash};

/// Errors from encoding, decoding, and key handling.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Rejections produced by the registry's state-transition rules.
///
/// Each variant maps to a stable numeric code (see [`DocumentError::code`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("caller is not the owner of {0}")]
    Unauthorized(DocumentHash),

    #[error("document {0} already exists")]
    DuplicateDocument(DocumentHash),

    #[error("document {0} not found")]
    NotFound(DocumentHash),

    #[error("document {hash} expired at {expires_at}")]
    Expired {
        hash: DocumentHash,
        expires_at: BlockHeight,
    },

    #[error("document name must be 1..={max} characters")]
    InvalidName { max: usize },

    #[error("document {hash} is not active (status {status:?})")]
    Inactive { hash: DocumentHash, status: String },

    #[error("status must be 1..={max} characters")]
    InvalidStatus { max: usize },

    #[error("the zero principal cannot own a document")]
    InvalidOwner,

    #[error("metadata exceeds {max} characters")]
    MetadataTooLong { max: usize },
}

impl DocumentError {
    /// The numeric code reported to the host.
    pub fn code(&self) -> ErrorCode {
        match self {
            DocumentError::Unauthorized(_) => ErrorCode::Unauthorized,
            DocumentError::DuplicateDocument(_) => ErrorCode::DuplicateDocument,
            DocumentError::NotFound(_) => ErrorCode::NotFound,
            DocumentError::Expired { .. } => ErrorCode::Expired,
            DocumentError::InvalidName { .. } => ErrorCode::InvalidName,
            DocumentError::Inactive { .. } => ErrorCode::Inactive,
            DocumentError::InvalidStatus { .. } => ErrorCode::InvalidStatus,
            DocumentError::InvalidOwner => ErrorCode::InvalidOwner,
            DocumentError::MetadataTooLong { .. } => ErrorCode::MetadataTooLong,
        }
    }
}

/// Stable numeric error codes, as the host sees them (`err u107`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ErrorCode {
    Unauthorized = 100,
    DuplicateDocument = 101,
    NotFound = 102,
    Expired = 103,
    InvalidName = 104,
    Inactive = 105,
    InvalidStatus = 106,
    InvalidOwner = 107,
    MetadataTooLong = 108,
}

impl ErrorCode {
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            100 => Some(ErrorCode::Unauthorized),
            101 => Some(ErrorCode::DuplicateDocument),
            102 => Some(ErrorCode::NotFound),
            103 => Some(ErrorCode::Expired),
            104 => Some(ErrorCode::InvalidName),
            105 => Some(ErrorCode::Inactive),
            106 => Some(ErrorCode::InvalidStatus),
            107 => Some(ErrorCode::InvalidOwner),
            108 => Some(ErrorCode::MetadataTooLong),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "u{}", self.as_u32())
    }
}
