//! Document records: the registry's only entity.
//!
//! A record is created once per [`DocumentHash`], mutated in place by its
//! owner, and never deleted. Expiration is not stored state; it is derived
//! from `expires_at` and the height the caller observes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::canonical_record_bytes;
use crate::crypto::Blake3Hash;
use crate::error::CoreError;
use crate::identity::Principal;
use crate::types::{BlockHeight, DocumentHash};

/// Lifecycle status of a record.
///
/// `active` and `inactive` are well known; any other non-empty text is kept
/// verbatim. Only [`DocumentStatus::Active`] passes verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DocumentStatus {
    #[default]
    Active,
    Inactive,
    Custom(String),
}

impl DocumentStatus {
    pub const ACTIVE: &'static str = "active";
    pub const INACTIVE: &'static str = "inactive";

    /// Parse caller-supplied status text. Empty text has no status.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "" => None,
            Self::ACTIVE => Some(DocumentStatus::Active),
            Self::INACTIVE => Some(DocumentStatus::Inactive),
            other => Some(DocumentStatus::Custom(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DocumentStatus::Active => Self::ACTIVE,
            DocumentStatus::Inactive => Self::INACTIVE,
            DocumentStatus::Custom(text) => text,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, DocumentStatus::Active)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DocumentStatus> for String {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Custom(text) => text,
            other => other.as_str().to_string(),
        }
    }
}

impl TryFrom<String> for DocumentStatus {
    type Error = CoreError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        DocumentStatus::parse(&text)
            .ok_or_else(|| CoreError::MalformedRecord("empty status".into()))
    }
}

/// A registered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Primary key, immutable.
    pub hash: DocumentHash,
    /// Current custodian; changes only through ownership transfer.
    pub owner: Principal,
    /// Label given at creation, immutable.
    pub name: String,
    pub metadata: Option<String>,
    /// Absolute height after which the record no longer verifies.
    pub expires_at: Option<BlockHeight>,
    pub status: DocumentStatus,
    pub created_at: BlockHeight,
    /// Height of the last successful mutation.
    pub updated_at: BlockHeight,
}

impl DocumentRecord {
    /// A freshly stored record: active, owned by `owner`.
    pub fn new(
        hash: DocumentHash,
        owner: Principal,
        name: impl Into<String>,
        metadata: Option<String>,
        expires_at: Option<BlockHeight>,
        created_at: BlockHeight,
    ) -> Self {
        Self {
            hash,
            owner,
            name: name.into(),
            metadata,
            expires_at,
            status: DocumentStatus::Active,
            created_at,
            updated_at: created_at,
        }
    }

    /// Whether the record has expired as seen from `now`.
    ///
    /// A record with `expires_at = T` is still valid at height `T`.
    pub fn is_expired_at(&self, now: BlockHeight) -> bool {
        matches!(self.expires_at, Some(expires_at) if now > expires_at)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        self.owner == *principal
    }

    /// Blake3 of the canonical encoding. Any field change changes it.
    pub fn fingerprint(&self) -> Blake3Hash {
        Blake3Hash::hash(&canonical_record_bytes(self))
    }
}
