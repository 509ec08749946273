//! Vault configuration.

use covault_crypto::{derive_vault_key, CryptoResult, VaultKey};
use serde::Deserialize;
use std::fmt;

/// Configuration for the credential vault, loaded once at process startup.
///
/// The at-rest secret is the single input to the process-wide key; the key
/// is derived exactly once and injected into [`CredentialVault`], so tests
/// can substitute a fixed key instead of going through the KDF.
///
/// [`CredentialVault`]: crate::CredentialVault
#[derive(Clone, Deserialize)]
pub struct VaultConfig {
    /// Deployment secret the at-rest key is derived from.
    pub at_rest_secret: String,
}

impl VaultConfig {
    pub fn new(at_rest_secret: impl Into<String>) -> Self {
        Self {
            at_rest_secret: at_rest_secret.into(),
        }
    }

    /// Derives the process-wide vault key from the configured secret.
    pub fn derive_key(&self) -> CryptoResult<VaultKey> {
        derive_vault_key(&self.at_rest_secret)
    }
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The configured secret never appears in logs
        f.debug_struct("VaultConfig")
            .field("at_rest_secret", &"<redacted>")
            .finish()
    }
}
