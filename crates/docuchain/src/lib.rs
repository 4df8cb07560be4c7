//! # Docuchain
//!
//! A document-provenance registry: records the hash of a document together
//! with its owner, metadata, optional expiration height, and lifecycle
//! status, and lets callers verify validity and transfer custody.
//!
//! ## Key Concepts
//!
//! - **Record**: One per document hash. Stored once, never overwritten, never deleted.
//! - **Owner**: The only principal that may change metadata, status, or owner.
//! - **Expiration**: Derived at verification time from the caller's block height.
//! - **Zero principal**: Reserved; can never receive a record.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docuchain::{Call, Registry, RegistryConfig};
//! use docuchain::core::{BlockHeight, DocumentHash, Principal};
//! use docuchain::store::MemoryStore;
//!
//! async fn example() {
//!     let mut registry = Registry::new(MemoryStore::new(), RegistryConfig::default());
//!
//!     let alice = Principal::from_bytes([0xa1; 32]);
//!     let hash = DocumentHash::digest(b"contract contents");
//!
//!     // The host supplies caller and block height for every call.
//!     let call = Call::new(alice, 10);
//!     registry
//!         .store_document(&call, hash, "contract.pdf", None, Some(BlockHeight::new(1_000)))
//!         .await
//!         .unwrap();
//!
//!     registry.verify(&call, hash).await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `docuchain::core` - Records, principals, canonical encoding, rules
//! - `docuchain::store` - Storage abstraction and SQLite

pub mod call;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod registry;

// Re-export component crates
pub use docuchain_core as core;
pub use docuchain_store as store;

pub use call::{Operation, Response, SignedCall};
pub use config::RegistryConfig;
pub use context::{Call, ExecutionContext};
pub use error::{RegistryError, Result};
pub use events::RegistryEvent;
pub use registry::Registry;

// Re-export commonly used core types
pub use docuchain_core::{
    BlockHeight, DocumentError, DocumentHash, DocumentRecord, DocumentStatus, ErrorCode, Keypair,
    Limits, Principal,
};
