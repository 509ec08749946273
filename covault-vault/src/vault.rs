//! The authorization & audit gate and the vault's operation surface.

use crate::error::{VaultError, VaultResult};
use crate::model::{Credential, CredentialUpdate, CredentialView, NewCredential};
use crate::reconcile::reconcile_secret;
use crate::session::Session;
use crate::store::{AuditEntry, RecordStore, StoreError};
use chrono::Utc;
use covault_crypto::{decrypt_secret, encrypt_secret, CryptoError, VaultKey};
use covault_types::{ClientId, CredentialId, Principal};
use tracing::{error, info, warn};

/// The credential vault.
///
/// Holds the process-wide key (injected once at startup) and the record
/// store, and enforces the principal → client → credential ownership chain
/// on every operation. This is the only code path in the system that calls
/// [`decrypt_secret`]; decrypting anywhere else is a contract violation.
pub struct CredentialVault<S> {
    key: VaultKey,
    store: S,
}

impl<S: RecordStore> CredentialVault<S> {
    pub fn new(key: VaultKey, store: S) -> Self {
        Self { key, store }
    }

    /// The underlying record store (for backend-specific administration).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a credential, encrypting the optional initial secret
    /// immediately. Empty input means "no secret".
    pub fn create(&self, session: &dyn Session, new: NewCredential) -> VaultResult<Credential> {
        let principal = self.authenticate(session)?;
        if new.kind.trim().is_empty() {
            return Err(VaultError::InvalidKind);
        }
        self.authorize_client(&principal, new.client_id)?;

        let secret = match new.secret.as_deref() {
            None | Some("") => None,
            Some(plaintext) => Some(encrypt_secret(&self.key, plaintext).map_err(|e| {
                error!("secret encryption failed: {e}");
                VaultError::Encryption
            })?),
        };

        let credential = Credential {
            id: CredentialId::new(),
            client_id: new.client_id,
            kind: new.kind,
            display_name: new.display_name,
            url: new.url,
            username: new.username,
            port: new.port,
            notes: new.notes,
            secret,
            created_by: principal,
            created_at: Utc::now(),
        };
        self.store.save_credential(&credential)?;

        info!(
            "created {} credential {} for client {}",
            credential.kind, credential.id, credential.client_id
        );
        Ok(credential)
    }

    /// Applies an update, recomputing the full next state from the submitted
    /// payload and the stored credential. The secret field goes through the
    /// four-way reconciliation; id, owner, creator, and creation time are
    /// immutable.
    pub fn update(
        &self,
        session: &dyn Session,
        id: CredentialId,
        update: CredentialUpdate,
    ) -> VaultResult<Credential> {
        let principal = self.authenticate(session)?;
        let prev = self.load_authorized(&principal, id)?;

        if let Some(kind) = &update.kind {
            if kind.trim().is_empty() {
                return Err(VaultError::InvalidKind);
            }
        }

        let secret = reconcile_secret(&self.key, prev.secret, update.secret)?;

        let next = Credential {
            id: prev.id,
            client_id: prev.client_id,
            kind: update.kind.unwrap_or(prev.kind),
            display_name: update.display_name.or(prev.display_name),
            url: update.url.or(prev.url),
            username: update.username.or(prev.username),
            port: update.port.or(prev.port),
            notes: update.notes.or(prev.notes),
            secret,
            created_by: prev.created_by,
            created_at: prev.created_at,
        };
        self.store.save_credential(&next)?;

        info!("updated credential {}", next.id);
        Ok(next)
    }

    /// Masked projection of one credential.
    pub fn get(&self, session: &dyn Session, id: CredentialId) -> VaultResult<CredentialView> {
        let principal = self.authenticate(session)?;
        let credential = self.load_authorized(&principal, id)?;
        Ok(CredentialView::from_credential(&credential))
    }

    /// Masked projections of a client's credentials. Plaintext never leaves
    /// the process on this path.
    pub fn list_for_client(
        &self,
        session: &dyn Session,
        client_id: ClientId,
    ) -> VaultResult<Vec<CredentialView>> {
        let principal = self.authenticate(session)?;
        self.authorize_client(&principal, client_id)?;

        let credentials = self.store.list_for_client(client_id)?;
        Ok(credentials.iter().map(CredentialView::from_credential).collect())
    }

    /// Hard-deletes a credential and its ciphertext.
    pub fn delete(&self, session: &dyn Session, id: CredentialId) -> VaultResult<()> {
        let principal = self.authenticate(session)?;
        let credential = self.load_authorized(&principal, id)?;
        self.store.delete_credential(credential.id)?;

        info!("deleted credential {}", credential.id);
        Ok(())
    }

    /// The explicit, authorized, audited operation that returns true
    /// plaintext.
    ///
    /// Ownership mismatch is reported as [`VaultError::NotFound`], identical
    /// to a nonexistent id. Decryption failures surface as
    /// [`VaultError::DecryptionUnavailable`] with no cipher detail. On
    /// success an audit entry is appended synchronously before the plaintext
    /// is returned; the append is best-effort and never blocks the reveal.
    pub fn reveal(&self, session: &dyn Session, id: CredentialId) -> VaultResult<String> {
        let principal = self.authenticate(session)?;
        let credential = match self.load_authorized(&principal, id) {
            Ok(credential) => credential,
            Err(VaultError::Store(StoreError::CorruptSecret(detail))) => {
                warn!("stored secret for credential {id} unreadable: {detail}");
                return Err(VaultError::DecryptionUnavailable);
            }
            Err(e) => return Err(e),
        };

        let Some(envelope) = credential.secret.as_ref() else {
            return Err(VaultError::NoSecret);
        };

        let plaintext = match decrypt_secret(&self.key, envelope) {
            Ok(plaintext) => plaintext,
            Err(CryptoError::Authentication) => {
                error!(
                    "integrity check failed for credential {} secret",
                    credential.id
                );
                return Err(VaultError::DecryptionUnavailable);
            }
            Err(e) => {
                warn!("stored secret for credential {} unreadable: {e}", credential.id);
                return Err(VaultError::DecryptionUnavailable);
            }
        };

        let entry = AuditEntry {
            principal: principal.clone(),
            credential_id: credential.id,
            client_id: credential.client_id,
            kind: credential.kind.clone(),
            display_name: credential.display_name.clone(),
            revealed_at: Utc::now(),
        };
        if let Err(e) = self.store.append_audit(&entry) {
            warn!(
                "audit append failed for reveal of credential {} by {}: {e}",
                credential.id, principal
            );
        }

        info!("revealed credential {} to {}", credential.id, principal);
        Ok(plaintext)
    }

    fn authenticate(&self, session: &dyn Session) -> VaultResult<Principal> {
        session.current_principal().ok_or(VaultError::Unauthenticated)
    }

    /// Ownership check: the principal must own the client record. A missing
    /// client and a foreign client report identically.
    fn authorize_client(&self, principal: &Principal, client_id: ClientId) -> VaultResult<()> {
        match self.store.find_client_owner(client_id)? {
            Some(owner) if owner == *principal => Ok(()),
            _ => Err(VaultError::NotFound),
        }
    }

    /// Resolves a credential through the ownership chain. Nonexistent
    /// credential, nonexistent client, and foreign owner are one error.
    fn load_authorized(
        &self,
        principal: &Principal,
        id: CredentialId,
    ) -> VaultResult<Credential> {
        let credential = self
            .store
            .find_credential(id)?
            .ok_or(VaultError::NotFound)?;
        self.authorize_client(principal, credential.client_id)?;
        Ok(credential)
    }
}
