//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in the cipher engine.
///
/// `CorruptEnvelope` and `Authentication` are deliberately distinct: a
/// malformed envelope points at a data-format bug, a failed tag points at
/// tampering or a key mismatch, and callers treat them differently.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed: {0}")]
    Cipher(String),

    #[error("malformed envelope: {0}")]
    CorruptEnvelope(String),

    #[error("integrity check failed (wrong key or tampered data)")]
    Authentication,
}
