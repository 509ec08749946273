//! Record store boundary.
//!
//! The vault does not own persistence. It consumes this trait; backends
//! (covault-storage in production, an in-memory double in tests) implement
//! it and map their native errors into [`StoreError`].

use crate::model::Credential;
use chrono::{DateTime, Utc};
use covault_types::{ClientId, CredentialId, Principal};
use serde::Serialize;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors crossing the record-store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A persisted secret no longer matches the envelope shape. Surfaced as
    /// a server-side data error on ordinary paths; the reveal gate translates
    /// it so cipher detail never reaches that caller.
    #[error("stored secret is corrupt: {0}")]
    CorruptSecret(String),
}

/// One audit record per successful reveal.
#[derive(Clone, Debug, Serialize)]
pub struct AuditEntry {
    pub principal: Principal,
    pub credential_id: CredentialId,
    pub client_id: ClientId,
    pub kind: String,
    pub display_name: Option<String>,
    pub revealed_at: DateTime<Utc>,
}

/// The record/ownership store the vault runs against.
///
/// `save_credential` is a full-state upsert: every update writes the
/// complete recomputed credential, so last-write-wins at the storage layer
/// is the only concurrency control this subsystem needs.
pub trait RecordStore {
    fn find_credential(&self, id: CredentialId) -> StoreResult<Option<Credential>>;

    /// Resolves the owning principal of a client record, if the record exists.
    fn find_client_owner(&self, client_id: ClientId) -> StoreResult<Option<Principal>>;

    fn save_credential(&self, credential: &Credential) -> StoreResult<()>;

    /// Hard delete — the ciphertext is gone, there is no soft-delete state.
    fn delete_credential(&self, id: CredentialId) -> StoreResult<()>;

    fn list_for_client(&self, client_id: ClientId) -> StoreResult<Vec<Credential>>;

    fn append_audit(&self, entry: &AuditEntry) -> StoreResult<()>;
}
