//! Events emitted after successful mutations.
//!
//! Events are an observation channel only. Nothing in the registry reads
//! them back, and a missing or lagging subscriber never fails a call.

use serde::{Deserialize, Serialize};

use docuchain_core::{BlockHeight, DocumentHash, DocumentStatus, Principal};

/// A committed change to a document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum RegistryEvent {
    DocumentStored {
        hash: DocumentHash,
        owner: Principal,
        expires_at: Option<BlockHeight>,
        at: BlockHeight,
    },
    MetadataUpdated {
        hash: DocumentHash,
        by: Principal,
        cleared: bool,
        at: BlockHeight,
    },
    StatusChanged {
        hash: DocumentHash,
        by: Principal,
        from: DocumentStatus,
        to: DocumentStatus,
        at: BlockHeight,
    },
    OwnershipTransferred {
        hash: DocumentHash,
        from: Principal,
        to: Principal,
        at: BlockHeight,
    },
}

impl RegistryEvent {
    /// The document the event concerns.
    pub fn hash(&self) -> &DocumentHash {
        match self {
            RegistryEvent::DocumentStored { hash, .. }
            | RegistryEvent::MetadataUpdated { hash, .. }
            | RegistryEvent::StatusChanged { hash, .. }
            | RegistryEvent::OwnershipTransferred { hash, .. } => hash,
        }
    }

    /// Block height at which the change was committed.
    pub fn at(&self) -> BlockHeight {
        match self {
            RegistryEvent::DocumentStored { at, .. }
            | RegistryEvent::MetadataUpdated { at, .. }
            | RegistryEvent::StatusChanged { at, .. }
            | RegistryEvent::OwnershipTransferred { at, .. } => *at,
        }
    }
}
