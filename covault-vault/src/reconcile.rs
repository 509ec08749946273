//! Update reconciliation for the secret field.

use crate::error::{VaultError, VaultResult};
use crate::field::SecretInput;
use covault_crypto::{encrypt_secret, Envelope, VaultKey};
use tracing::error;

/// Decides the next stored state of a secret from the previously stored
/// envelope and the classified caller submission.
///
/// The mask case is the one that matters: a caller redisplaying the sentinel
/// must keep the original envelope untouched. Encrypting the sentinel text
/// as if it were a real secret would silently destroy the stored value, so
/// that branch is ruled out by the closed enumeration rather than by
/// convention.
pub fn reconcile_secret(
    key: &VaultKey,
    prev: Option<Envelope>,
    input: SecretInput,
) -> VaultResult<Option<Envelope>> {
    match input {
        SecretInput::Omitted | SecretInput::Masked => Ok(prev),
        SecretInput::Cleared => Ok(None),
        SecretInput::Value(plaintext) => {
            let envelope = encrypt_secret(key, &plaintext).map_err(|e| {
                error!("secret encryption failed: {e}");
                VaultError::Encryption
            })?;
            Ok(Some(envelope))
        }
    }
}
