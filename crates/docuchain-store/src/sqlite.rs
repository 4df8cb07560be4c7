//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for Docuchain. It uses rusqlite with
//! bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use docuchain_core::{
    canonical_record_bytes, decode_record, BlockHeight, DocumentHash, DocumentRecord, Principal,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{InsertResult, Store, UpdateResult};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking thread pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Task(format!("mutex poisoned: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(format!("spawn_blocking failed: {}", e)))?
    }
}

fn hash_from_blob(bytes: Vec<u8>) -> Result<DocumentHash> {
    DocumentHash::try_from(bytes.as_slice())
        .map_err(|_| StoreError::InvalidData(format!("document hash of {} bytes", bytes.len())))
}

/// SQLite integers are signed; heights past `i64::MAX` have no column value.
fn height_column(height: BlockHeight, column: &str) -> Result<i64> {
    i64::try_from(height.get())
        .map_err(|_| StoreError::InvalidData(format!("{} {} exceeds i64::MAX", column, height)))
}

#[async_trait]
impl Store for SqliteStore {
    async fn get_document(&self, hash: &DocumentHash) -> Result<Option<DocumentRecord>> {
        let hash = *hash;

        self.with_conn(move |conn| {
            let blob: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT record FROM documents WHERE document_hash = ?1",
                    params![hash.0.as_slice()],
                    |row| row.get(0),
                )
                .optional()?;

            match blob {
                Some(bytes) => {
                    let record = decode_record(&bytes)?;
                    if record.hash != hash {
                        return Err(StoreError::InvalidData(format!(
                            "row {} holds record for {}",
                            hash, record.hash
                        )));
                    }
                    Ok(Some(record))
                }
                None => Ok(None),
            }
        })
        .await
    }

    async fn insert_document(&self, record: &DocumentRecord) -> Result<InsertResult> {
        let record = record.clone();

        self.with_conn(move |conn| {
            let created_at = height_column(record.created_at, "created_at")?;
            let updated_at = height_column(record.updated_at, "updated_at")?;

            // INSERT OR IGNORE never touches an existing row.
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO documents (
                    document_hash, owner, record, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.hash.0.as_slice(),
                    record.owner.0.as_slice(),
                    canonical_record_bytes(&record),
                    created_at,
                    updated_at,
                ],
            )?;

            if inserted == 0 {
                Ok(InsertResult::AlreadyExists)
            } else {
                tracing::trace!(hash = %record.hash, "inserted document row");
                Ok(InsertResult::Inserted)
            }
        })
        .await
    }

    async fn update_document(
        &self,
        previous: &DocumentRecord,
        record: &DocumentRecord,
    ) -> Result<UpdateResult> {
        let expected = canonical_record_bytes(previous);
        let record = record.clone();

        self.with_conn(move |conn| {
            let updated_at = height_column(record.updated_at, "updated_at")?;

            // The row only changes if it still holds the record the caller read.
            let updated = conn.execute(
                "UPDATE documents SET owner = ?2, record = ?3, updated_at = ?4
                 WHERE document_hash = ?1 AND record = ?5",
                params![
                    record.hash.0.as_slice(),
                    record.owner.0.as_slice(),
                    canonical_record_bytes(&record),
                    updated_at,
                    expected,
                ],
            )?;

            if updated > 0 {
                return Ok(UpdateResult::Updated);
            }

            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM documents WHERE document_hash = ?1)",
                params![record.hash.0.as_slice()],
                |row| row.get(0),
            )?;
            if exists {
                tracing::trace!(hash = %record.hash, "stale update rejected");
                Ok(UpdateResult::Conflict)
            } else {
                Err(StoreError::NotFound(record.hash))
            }
        })
        .await
    }

    async fn has_document(&self, hash: &DocumentHash) -> Result<bool> {
        let hash = *hash;

        self.with_conn(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM documents WHERE document_hash = ?1)",
                params![hash.0.as_slice()],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    async fn list_documents(&self, owner: Option<&Principal>) -> Result<Vec<DocumentHash>> {
        let owner = owner.copied();

        self.with_conn(move |conn| {
            let blobs: Vec<Vec<u8>> = match owner {
                Some(owner) => {
                    let mut stmt = conn.prepare(
                        "SELECT document_hash FROM documents WHERE owner = ?1
                         ORDER BY document_hash",
                    )?;
                    let rows = stmt.query_map(params![owner.0.as_slice()], |row| row.get(0))?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
                None => {
                    let mut stmt =
                        conn.prepare("SELECT document_hash FROM documents ORDER BY document_hash")?;
                    let rows = stmt.query_map([], |row| row.get(0))?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
            };

            blobs.into_iter().map(hash_from_blob).collect()
        })
        .await
    }

    async fn document_count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docuchain_core::{BlockHeight, DocumentStatus};

    fn make_record(byte: u8, owner: u8) -> DocumentRecord {
        DocumentRecord::new(
            DocumentHash::from_bytes([byte; 32]),
            Principal::from_bytes([owner; 32]),
            format!("doc-{}", byte),
            Some("meta".into()),
            Some(BlockHeight::new(500)),
            BlockHeight::new(7),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get_document() {
        let store = SqliteStore::open_memory().unwrap();
        let record = make_record(1, 0xaa);

        let result = store.insert_document(&record).await.unwrap();
        assert_eq!(result, InsertResult::Inserted);

        let retrieved = store.get_document(&record.hash).await.unwrap().unwrap();
        assert_eq!(retrieved, record);
    }

    #[tokio::test]
    async fn test_duplicate_insert_keeps_original() {
        let store = SqliteStore::open_memory().unwrap();
        let record = make_record(1, 0xaa);
        store.insert_document(&record).await.unwrap();

        let mut other = make_record(1, 0xbb);
        other.name = "replacement".into();
        let r2 = store.insert_document(&other).await.unwrap();
        assert_eq!(r2, InsertResult::AlreadyExists);

        let stored = store.get_document(&record.hash).await.unwrap().unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_update_document() {
        let store = SqliteStore::open_memory().unwrap();
        let mut record = make_record(1, 0xaa);
        store.insert_document(&record).await.unwrap();

        record.owner = Principal::from_bytes([0xbb; 32]);
        record.status = DocumentStatus::Inactive;
        record.updated_at = BlockHeight::new(9);
        let previous = make_record(1, 0xaa);
        let r = store.update_document(&previous, &record).await.unwrap();
        assert_eq!(r, UpdateResult::Updated);

        let stored = store.get_document(&record.hash).await.unwrap().unwrap();
        assert_eq!(stored, record);

        let new_owner = Principal::from_bytes([0xbb; 32]);
        assert_eq!(
            store.list_documents(Some(&new_owner)).await.unwrap(),
            vec![record.hash]
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = SqliteStore::open_memory().unwrap();
        let record = make_record(1, 0xaa);
        let err = store.update_document(&record, &record).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(!store.has_document(&record.hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_stale_update_conflicts() {
        let store = SqliteStore::open_memory().unwrap();
        let original = make_record(1, 0xaa);
        store.insert_document(&original).await.unwrap();

        let mut transferred = original.clone();
        transferred.owner = Principal::from_bytes([0xbb; 32]);
        transferred.updated_at = BlockHeight::new(8);
        let r = store.update_document(&original, &transferred).await.unwrap();
        assert_eq!(r, UpdateResult::Updated);

        let mut stale = original.clone();
        stale.metadata = Some("x".into());
        stale.updated_at = BlockHeight::new(8);
        let r = store.update_document(&original, &stale).await.unwrap();
        assert_eq!(r, UpdateResult::Conflict);

        let stored = store.get_document(&original.hash).await.unwrap().unwrap();
        assert_eq!(stored, transferred);
        assert!(store
            .list_documents(Some(&Principal::from_bytes([0xaa; 32])))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_heights_beyond_column_range_rejected() {
        let store = SqliteStore::open_memory().unwrap();
        let mut record = make_record(5, 0xaa);
        record.created_at = BlockHeight::new(u64::MAX);
        record.updated_at = BlockHeight::new(u64::MAX);

        let err = store.insert_document(&record).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
        assert!(!store.has_document(&record.hash).await.unwrap());

        let mut stored = make_record(6, 0xaa);
        store.insert_document(&stored).await.unwrap();
        let previous = stored.clone();
        stored.updated_at = BlockHeight::new(i64::MAX as u64 + 1);
        let err = store.update_document(&previous, &stored).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
        assert_eq!(store.get_document(&previous.hash).await.unwrap(), Some(previous));
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert_document(&make_record(2, 0xaa)).await.unwrap();
        store.insert_document(&make_record(1, 0xaa)).await.unwrap();
        store.insert_document(&make_record(3, 0xcc)).await.unwrap();

        let owner = Principal::from_bytes([0xaa; 32]);
        assert_eq!(
            store.list_documents(Some(&owner)).await.unwrap(),
            vec![
                DocumentHash::from_bytes([1; 32]),
                DocumentHash::from_bytes([2; 32])
            ]
        );
        assert_eq!(store.document_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reopen_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.db");
        let record = make_record(4, 0xaa);

        {
            let store = SqliteStore::open(&path).unwrap();
            store.insert_document(&record).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_document(&record.hash).await.unwrap(), Some(record));
    }
}
