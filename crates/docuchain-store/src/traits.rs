//! Store trait: the abstract interface for record persistence.
//!
//! This trait keeps the registry storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use docuchain_core::{DocumentHash, DocumentRecord, Principal};

use crate::error::Result;

/// Result of inserting a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertResult {
    /// Record was inserted.
    Inserted,
    /// A record with this hash already exists. Nothing was written.
    AlreadyExists,
}

/// Result of a compare-and-swap update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// The stored record matched `previous` and was replaced.
    Updated,
    /// The stored record no longer matches `previous`. Nothing was written.
    Conflict,
}

/// The Store trait: async key-value interface over document records.
///
/// Keyed by [`DocumentHash`]. Records are never deleted.
///
/// # Design Notes
///
/// - **No overwrite on insert**: Inserting an existing hash returns
///   `AlreadyExists` and leaves the stored record untouched.
/// - **Update requires presence**: Updating a missing hash is
///   `StoreError::NotFound`; it never creates a record.
/// - **Compare-and-swap update**: An update names the record it was derived
///   from and only applies if that is still what is stored, so handles that
///   share a store never overwrite each other's commits.
#[async_trait]
pub trait Store: Send + Sync {
    /// Get a record by hash.
    async fn get_document(&self, hash: &DocumentHash) -> Result<Option<DocumentRecord>>;

    /// Insert a new record.
    ///
    /// # Returns
    /// - `Inserted` if the hash was new.
    /// - `AlreadyExists` if any record is stored under this hash.
    async fn insert_document(&self, record: &DocumentRecord) -> Result<InsertResult>;

    /// Replace `previous` with `record`, atomically.
    ///
    /// # Returns
    /// - `Updated` if the stored record still equals `previous`.
    /// - `Conflict` if another writer changed it first.
    /// - `StoreError::NotFound` if no record is stored under the hash.
    async fn update_document(
        &self,
        previous: &DocumentRecord,
        record: &DocumentRecord,
    ) -> Result<UpdateResult>;

    /// Check whether a record exists.
    async fn has_document(&self, hash: &DocumentHash) -> Result<bool>;

    /// List record hashes, optionally only those owned by `owner`.
    ///
    /// Ordered by hash bytes.
    async fn list_documents(&self, owner: Option<&Principal>) -> Result<Vec<DocumentHash>>;

    /// Number of stored records.
    async fn document_count(&self) -> Result<u64>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    async fn get_document(&self, hash: &DocumentHash) -> Result<Option<DocumentRecord>> {
        (**self).get_document(hash).await
    }

    async fn insert_document(&self, record: &DocumentRecord) -> Result<InsertResult> {
        (**self).insert_document(record).await
    }

    async fn update_document(
        &self,
        previous: &DocumentRecord,
        record: &DocumentRecord,
    ) -> Result<UpdateResult> {
        (**self).update_document(previous, record).await
    }

    async fn has_document(&self, hash: &DocumentHash) -> Result<bool> {
        (**self).has_document(hash).await
    }

    async fn list_documents(&self, owner: Option<&Principal>) -> Result<Vec<DocumentHash>> {
        (**self).list_documents(owner).await
    }

    async fn document_count(&self) -> Result<u64> {
        (**self).document_count().await
    }
}
