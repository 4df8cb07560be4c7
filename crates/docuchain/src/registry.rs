//! The Registry: the document record state machine.
//!
//! Every operation reads the current record, runs its preconditions in a
//! fixed order (existence, authorization, value validity), and writes at
//! most once, after all checks pass. A returned error therefore means the
//! store was not touched.
//!
//! Mutations take `&mut self`: the host sequences calls, and one registry
//! handle applies them one at a time. Handles sharing a store are kept apart
//! by compare-and-swap commits: a mutation that loses a race is re-checked
//! against the fresh record, never written over it.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use docuchain_core::validation::{
    check_validity, require_absent, require_existing, require_owner, require_valid_owner,
};
use docuchain_core::{BlockHeight, DocumentError, DocumentHash, DocumentRecord, Principal};
use docuchain_store::{InsertResult, Store, StoreError, UpdateResult};

use crate::call::{Operation, Response, SignedCall};
use crate::config::RegistryConfig;
use crate::context::ExecutionContext;
use crate::error::{RegistryError, Result};
use crate::events::RegistryEvent;

/// Commit attempts per mutation before giving up with `StoreError::Conflict`.
const MAX_COMMIT_ATTEMPTS: usize = 8;

/// The document registry.
///
/// Provides:
/// - Storing new document records
/// - Verifying a record's validity at the caller's block height
/// - Owner-only metadata, status, and ownership changes
/// - Read-only queries and a numeric-code call surface
pub struct Registry<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: RegistryConfig,
    /// Committed-change notifications.
    events: broadcast::Sender<RegistryEvent>,
}

impl<S: Store> Registry<S> {
    /// Create a new registry over `store`.
    pub fn new(store: S, config: RegistryConfig) -> Self {
        Self::with_shared_store(Arc::new(store), config)
    }

    /// Create a registry over a store shared with other handles.
    ///
    /// Every handle may mutate; concurrent commits to one record are
    /// serialized and none is lost.
    pub fn with_shared_store(store: Arc<S>, config: RegistryConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            store,
            config,
            events,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The limits and channel capacity this registry runs with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Receive every event committed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutating Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a new document owned by the caller.
    ///
    /// `expires_at` is an absolute block height, not a duration.
    pub async fn store_document(
        &mut self,
        ctx: &impl ExecutionContext,
        hash: DocumentHash,
        name: &str,
        metadata: Option<String>,
        expires_at: Option<BlockHeight>,
    ) -> Result<()> {
        let caller = ctx.caller();
        let now = ctx.block_height();
        debug!(%hash, %caller, %now, "store-document");

        let existing = self.store.get_document(&hash).await?;
        require_absent(&hash, existing.as_ref()).map_err(rejected)?;
        self.config.limits.check_name(name).map_err(rejected)?;
        self.config
            .limits
            .check_metadata(metadata.as_deref())
            .map_err(rejected)?;

        let record = DocumentRecord::new(hash, caller, name, metadata, expires_at, now);

        match self.store.insert_document(&record).await? {
            InsertResult::Inserted => {}
            InsertResult::AlreadyExists => {
                return Err(rejected(DocumentError::DuplicateDocument(hash)));
            }
        }

        info!(%hash, owner = %caller, ?expires_at, "document stored");
        self.emit(RegistryEvent::DocumentStored {
            hash,
            owner: caller,
            expires_at,
            at: now,
        });
        Ok(())
    }

    /// Replace the metadata. `None` clears it.
    pub async fn update_metadata(
        &mut self,
        ctx: &impl ExecutionContext,
        hash: DocumentHash,
        metadata: Option<String>,
    ) -> Result<()> {
        debug!(%hash, caller = %ctx.caller(), "update-metadata");

        let limits = self.config.limits;
        let cleared = metadata.is_none();
        self.mutate(ctx, &hash, |record| {
            limits.check_metadata(metadata.as_deref())?;
            record.metadata = metadata.clone();
            Ok(())
        })
        .await?;

        info!(%hash, cleared, "metadata updated");
        self.emit(RegistryEvent::MetadataUpdated {
            hash,
            by: ctx.caller(),
            cleared,
            at: ctx.block_height(),
        });
        Ok(())
    }

    /// Replace the lifecycle status.
    pub async fn set_document_status(
        &mut self,
        ctx: &impl ExecutionContext,
        hash: DocumentHash,
        status: &str,
    ) -> Result<()> {
        debug!(%hash, caller = %ctx.caller(), status, "set-document-status");

        let limits = self.config.limits;
        let (previous, status) = self
            .mutate(ctx, &hash, |record| {
                let status = limits.parse_status(status)?;
                let previous = std::mem::replace(&mut record.status, status.clone());
                Ok((previous, status))
            })
            .await?;

        info!(%hash, from = %previous, to = %status, "status changed");
        self.emit(RegistryEvent::StatusChanged {
            hash,
            by: ctx.caller(),
            from: previous,
            to: status,
            at: ctx.block_height(),
        });
        Ok(())
    }

    /// Hand the record to `new_owner`. The caller loses all mutation rights.
    pub async fn transfer_ownership(
        &mut self,
        ctx: &impl ExecutionContext,
        hash: DocumentHash,
        new_owner: Principal,
    ) -> Result<()> {
        debug!(%hash, caller = %ctx.caller(), %new_owner, "transfer-ownership");

        let previous = self
            .mutate(ctx, &hash, |record| {
                require_valid_owner(&new_owner)?;
                Ok(std::mem::replace(&mut record.owner, new_owner))
            })
            .await?;

        info!(%hash, from = %previous, to = %new_owner, "ownership transferred");
        self.emit(RegistryEvent::OwnershipTransferred {
            hash,
            from: previous,
            to: new_owner,
            at: ctx.block_height(),
        });
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Check validity at the caller's block height.
    ///
    /// Fails with `NotFound`, then `Expired`, then `Inactive`.
    pub async fn verify(&self, ctx: &impl ExecutionContext, hash: DocumentHash) -> Result<()> {
        let now = ctx.block_height();
        debug!(%hash, %now, "verify-document");

        let record = require_existing(&hash, self.store.get_document(&hash).await?)
            .map_err(rejected)?;
        check_validity(&record, now).map_err(rejected)?;
        Ok(())
    }

    /// Like [`Registry::verify`], but reports expiry and inactivity as `false`.
    ///
    /// A missing record is still an error.
    pub async fn is_valid(&self, ctx: &impl ExecutionContext, hash: DocumentHash) -> Result<bool> {
        match self.verify(ctx, hash).await {
            Ok(()) => Ok(true),
            Err(RegistryError::Document(
                DocumentError::Expired { .. } | DocumentError::Inactive { .. },
            )) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Get a record by hash.
    pub async fn get_document(&self, hash: &DocumentHash) -> Result<Option<DocumentRecord>> {
        Ok(self.store.get_document(hash).await?)
    }

    /// Hashes of all records currently owned by `owner`.
    pub async fn documents_owned_by(&self, owner: &Principal) -> Result<Vec<DocumentHash>> {
        Ok(self.store.list_documents(Some(owner)).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Call Surface
    // ─────────────────────────────────────────────────────────────────────────

    /// Run an operation and report it the way the host does.
    ///
    /// Rule violations become `Response::Err(code)`; storage failures are
    /// returned as errors.
    pub async fn dispatch(
        &mut self,
        ctx: &impl ExecutionContext,
        operation: Operation,
    ) -> Result<Response> {
        let result = match operation {
            Operation::StoreDocument {
                hash,
                name,
                metadata,
                expires_at,
            } => {
                self.store_document(ctx, hash, &name, metadata, expires_at)
                    .await
            }
            Operation::VerifyDocument { hash } => self.verify(ctx, hash).await,
            Operation::UpdateMetadata { hash, metadata } => {
                self.update_metadata(ctx, hash, metadata).await
            }
            Operation::SetDocumentStatus { hash, status } => {
                self.set_document_status(ctx, hash, &status).await
            }
            Operation::TransferOwnership { hash, new_owner } => {
                self.transfer_ownership(ctx, hash, new_owner).await
            }
        };

        match result {
            Ok(()) => Ok(Response::Ok(true)),
            Err(RegistryError::Document(e)) => Ok(Response::Err(e.code())),
            Err(e) => Err(e),
        }
    }

    /// Authenticate a signed call at `block_height`, then dispatch it.
    pub async fn submit(
        &mut self,
        signed: SignedCall,
        block_height: BlockHeight,
    ) -> Result<Response> {
        let call = signed.authenticate(block_height).map_err(|e| {
            warn!(
                op = signed.operation.name(),
                hash = %signed.operation.hash(),
                error = %e,
                "rejected unauthenticated call"
            );
            RegistryError::Authentication(e)
        })?;
        self.dispatch(&call, signed.operation).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Load a record the caller owns: `NotFound`, then `Unauthorized`.
    async fn load_owned(
        &self,
        ctx: &impl ExecutionContext,
        hash: &DocumentHash,
    ) -> Result<DocumentRecord> {
        let record =
            require_existing(hash, self.store.get_document(hash).await?).map_err(rejected)?;

        let caller = ctx.caller();
        if let Err(e) = require_owner(&record, &caller) {
            warn!(%hash, %caller, owner = %record.owner, "caller is not the owner");
            return Err(e.into());
        }

        Ok(record)
    }

    /// Load, check, and change an owned record, then commit it over the
    /// exact copy that was loaded, stamping the mutation height.
    ///
    /// `apply` runs the value checks and edits the record. If another handle
    /// committed in between, the whole sequence reruns on the fresh record,
    /// so existence and ownership are always judged against what is replaced.
    async fn mutate<T>(
        &self,
        ctx: &impl ExecutionContext,
        hash: &DocumentHash,
        apply: impl Fn(&mut DocumentRecord) -> std::result::Result<T, DocumentError>,
    ) -> Result<T> {
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let current = self.load_owned(ctx, hash).await?;

            let mut next = current.clone();
            let outcome = apply(&mut next).map_err(rejected)?;
            next.updated_at = ctx.block_height();

            match self.store.update_document(&current, &next).await? {
                UpdateResult::Updated => return Ok(outcome),
                UpdateResult::Conflict => {
                    debug!(%hash, attempt, "record changed underneath, retrying");
                }
            }
        }

        warn!(%hash, attempts = MAX_COMMIT_ATTEMPTS, "giving up on contended record");
        Err(StoreError::Conflict(*hash).into())
    }

    fn emit(&self, event: RegistryEvent) {
        let (hash, at) = (*event.hash(), event.at());
        // No subscribers is fine.
        let receivers = self.events.send(event).unwrap_or(0);
        trace!(%hash, %at, receivers, "event published");
    }
}

/// Log a rule violation and lift it into a registry error.
fn rejected(error: DocumentError) -> RegistryError {
    debug!(code = %error.code(), %error, "operation rejected");
    RegistryError::Document(error)
}
