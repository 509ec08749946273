//! Caller-visible vault error taxonomy.

use crate::store::StoreError;
use thiserror::Error;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors returned by vault operations.
///
/// Cipher-level failures are translated at the gate boundary: internal
/// cryptographic detail never reaches a caller. An ownership mismatch is
/// reported as `NotFound`, identical to nonexistence, so the vault never
/// confirms the existence of resources the principal cannot access.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("not found")]
    NotFound,

    #[error("a credential kind is required")]
    InvalidKind,

    #[error("credential has no stored secret")]
    NoSecret,

    #[error("could not encrypt secret")]
    Encryption,

    #[error("cannot decrypt stored secret")]
    DecryptionUnavailable,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
