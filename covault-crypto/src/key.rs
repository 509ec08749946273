//! Process-wide key derivation.
//!
//! The vault holds exactly one symmetric key, derived from the deployment's
//! configured secret with Argon2id and a fixed domain salt. There is no
//! rotation within a running process; rotating the configured secret means
//! re-encrypting all stored envelopes out of band.

use crate::error::{CryptoError, CryptoResult};
use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the derived key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Domain-separated fixed salt for at-rest key derivation.
///
/// A fixed salt is acceptable here because the input is a configured
/// machine secret, not a human password reused across sites.
const DOMAIN_SALT: &[u8; 16] = b"covault-at-rest\0";

/// Argon2id cost parameters.
#[derive(Clone, Debug)]
pub struct KdfParams {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        // OWASP-recommended interactive parameters: 19 MiB, 2 iterations
        Self {
            m_cost: 19 * 1024,
            t_cost: 2,
            p_cost: 1,
        }
    }
}

/// The process-wide symmetric key.
///
/// Immutable after derivation and zeroized on drop. Constructed once at
/// startup and passed by reference into every cipher operation, so tests can
/// substitute a fixed key deterministically.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VaultKey([u8; KEY_SIZE]);

impl VaultKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material never appears in logs or error messages
        f.write_str("VaultKey(..)")
    }
}

/// Derives the vault key from the configured secret with default parameters.
pub fn derive_vault_key(secret: &str) -> CryptoResult<VaultKey> {
    derive_vault_key_with(secret, &KdfParams::default())
}

/// Derives the vault key with explicit Argon2id parameters.
pub fn derive_vault_key_with(secret: &str, params: &KdfParams) -> CryptoResult<VaultKey> {
    if secret.is_empty() {
        return Err(CryptoError::KeyDerivation(
            "configured secret is empty".to_string(),
        ));
    }

    let argon_params = Params::new(params.m_cost, params.t_cost, params.p_cost, Some(KEY_SIZE))
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut out = [0u8; KEY_SIZE];
    argon
        .hash_password_into(secret.as_bytes(), DOMAIN_SALT, &mut out)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    Ok(VaultKey(out))
}
