//! # Docuchain Store
//!
//! Storage abstraction for the Docuchain registry. Provides a trait-based
//! interface for record persistence with SQLite and in-memory
//! implementations.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`InsertResult`] - Result of inserting a record
//! - [`UpdateResult`] - Result of a compare-and-swap update
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docuchain_store::{SqliteStore, Store, InsertResult};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("registry.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     // let result = store.insert_document(&record).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **No overwrite**: Inserting an existing hash returns `AlreadyExists`
//! - **No deletion**: Records live forever; only updates replace them
//! - **No lost updates**: Updates only apply over the record they were derived from
//! - **Canonical rows**: SQLite rows carry the canonical CBOR of the record

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{InsertResult, Store, UpdateResult};
