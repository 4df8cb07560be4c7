//! # Docuchain Core
//!
//! Pure primitives for the Docuchain document registry: records, principals,
//! block heights, canonical encoding, and the precondition rules every
//! registry operation is checked against.
//!
//! This crate contains no I/O, no storage, no async. It is pure computation
//! over document records.
//!
//! ## Key Types
//!
//! - [`DocumentRecord`] - A registered document hash with owner and lifecycle
//! - [`DocumentHash`] - The 32-byte primary key
//! - [`Principal`] - Caller identity; [`Principal::ZERO`] is reserved
//! - [`BlockHeight`] - Host-supplied logical time
//! - [`DocumentError`] / [`ErrorCode`] - Rule violations and their numeric codes
//!
//! ## Canonicalization
//!
//! Records are encoded using deterministic CBOR. See [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod record;
pub mod types;
pub mod validation;

pub use canonical::{canonical_record_bytes, decode_record};
pub use crypto::{Blake3Hash, Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{CoreError, DocumentError, ErrorCode};
pub use identity::Principal;
pub use record::{DocumentRecord, DocumentStatus};
pub use types::{BlockHeight, DocumentHash};
pub use validation::{check_validity, Limits};
