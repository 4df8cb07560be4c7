//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use docuchain_core::{DocumentHash, DocumentRecord, Principal};

use crate::error::{Result, StoreError};
use crate::traits::{InsertResult, Store, UpdateResult};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<DocumentHash, DocumentRecord>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<DocumentHash, DocumentRecord>>> {
        self.documents
            .read()
            .map_err(|e| StoreError::Task(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<DocumentHash, DocumentRecord>>> {
        self.documents
            .write()
            .map_err(|e| StoreError::Task(format!("lock poisoned: {}", e)))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_document(&self, hash: &DocumentHash) -> Result<Option<DocumentRecord>> {
        Ok(self.read()?.get(hash).cloned())
    }

    async fn insert_document(&self, record: &DocumentRecord) -> Result<InsertResult> {
        let mut documents = self.write()?;

        if documents.contains_key(&record.hash) {
            return Ok(InsertResult::AlreadyExists);
        }

        documents.insert(record.hash, record.clone());
        Ok(InsertResult::Inserted)
    }

    async fn update_document(
        &self,
        previous: &DocumentRecord,
        record: &DocumentRecord,
    ) -> Result<UpdateResult> {
        let mut documents = self.write()?;

        match documents.get_mut(&record.hash) {
            Some(stored) if stored == previous => {
                *stored = record.clone();
                Ok(UpdateResult::Updated)
            }
            Some(_) => Ok(UpdateResult::Conflict),
            None => Err(StoreError::NotFound(record.hash)),
        }
    }

    async fn has_document(&self, hash: &DocumentHash) -> Result<bool> {
        Ok(self.read()?.contains_key(hash))
    }

    async fn list_documents(&self, owner: Option<&Principal>) -> Result<Vec<DocumentHash>> {
        let documents = self.read()?;

        // BTreeMap iteration is already ordered by hash.
        let hashes = documents
            .values()
            .filter(|r| owner.map_or(true, |o| r.is_owned_by(o)))
            .map(|r| r.hash)
            .collect();

        Ok(hashes)
    }

    async fn document_count(&self) -> Result<u64> {
        Ok(self.read()?.len() as u64)
    }
}
