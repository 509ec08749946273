//! Credential model and its boundary shapes.

use crate::field::SecretInput;
use chrono::{DateTime, Utc};
use covault_crypto::{mask_secret, Envelope};
use covault_types::{ClientId, CredentialId, Principal};
use serde::{Deserialize, Serialize};

/// One stored secret-bearing entry attached to a client record.
///
/// `secret` is present only when a secret has been set, and always holds a
/// well-formed envelope — plaintext is never stored, and an encryption
/// failure aborts the write that would have produced it.
#[derive(Clone, Debug)]
pub struct Credential {
    pub id: CredentialId,
    pub client_id: ClientId,
    /// Free-form classification, e.g. "FTP" or "ADMIN_PANEL". Required.
    pub kind: String,
    pub display_name: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub port: Option<u16>,
    pub notes: Option<String>,
    pub secret: Option<Envelope>,
    pub created_by: Principal,
    pub created_at: DateTime<Utc>,
}

/// Read-side projection of a [`Credential`]: metadata plus the masking
/// sentinel in place of the stored envelope. This is the only shape list and
/// get paths ever return, so plaintext never leaves the process there.
#[derive(Clone, Debug, Serialize)]
pub struct CredentialView {
    pub id: CredentialId,
    pub client_id: ClientId,
    pub kind: String,
    pub display_name: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub port: Option<u16>,
    pub notes: Option<String>,
    /// The fixed sentinel when a secret exists, absent otherwise.
    pub secret: Option<&'static str>,
    pub created_by: Principal,
    pub created_at: DateTime<Utc>,
}

impl CredentialView {
    pub(crate) fn from_credential(credential: &Credential) -> Self {
        Self {
            id: credential.id,
            client_id: credential.client_id,
            kind: credential.kind.clone(),
            display_name: credential.display_name.clone(),
            url: credential.url.clone(),
            username: credential.username.clone(),
            port: credential.port,
            notes: credential.notes.clone(),
            secret: mask_secret(credential.secret.as_ref()),
            created_by: credential.created_by.clone(),
            created_at: credential.created_at,
        }
    }
}

/// Payload for creating a credential.
#[derive(Clone, Deserialize)]
pub struct NewCredential {
    pub client_id: ClientId,
    pub kind: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Optional initial secret; empty input means "no secret".
    #[serde(default)]
    pub secret: Option<String>,
}

/// Payload for updating a credential. Metadata fields left as `None` stay
/// unchanged; the secret field carries its own four-way classification.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CredentialUpdate {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub secret: SecretInput,
}
