//! In-memory test double for the record-store boundary.

use covault_types::{ClientId, CredentialId, Principal};
use covault_vault::{AuditEntry, Credential, RecordStore, Session, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// Hash-map backed `RecordStore` with audit capture and failure injection.
#[derive(Default)]
pub struct MemoryStore {
    clients: Mutex<HashMap<ClientId, Principal>>,
    credentials: Mutex<HashMap<CredentialId, Credential>>,
    audits: Mutex<Vec<AuditEntry>>,
    fail_audit: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client record owned by `owner` and returns its id.
    pub fn add_client(&self, owner: &Principal) -> ClientId {
        let id = ClientId::new();
        self.clients.lock().unwrap().insert(id, owner.clone());
        id
    }

    /// Makes every subsequent audit append fail.
    pub fn fail_audits(&self) {
        *self.fail_audit.lock().unwrap() = true;
    }

    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audits.lock().unwrap().clone()
    }

    /// The stored envelope in its persisted string form, for asserting that
    /// an update did or did not touch the ciphertext.
    pub fn stored_secret_text(&self, id: CredentialId) -> Option<String> {
        self.credentials
            .lock()
            .unwrap()
            .get(&id)
            .and_then(|c| c.secret.as_ref().map(|e| e.to_string()))
    }
}

impl RecordStore for MemoryStore {
    fn find_credential(&self, id: CredentialId) -> StoreResult<Option<Credential>> {
        Ok(self.credentials.lock().unwrap().get(&id).cloned())
    }

    fn find_client_owner(&self, client_id: ClientId) -> StoreResult<Option<Principal>> {
        Ok(self.clients.lock().unwrap().get(&client_id).cloned())
    }

    fn save_credential(&self, credential: &Credential) -> StoreResult<()> {
        self.credentials
            .lock()
            .unwrap()
            .insert(credential.id, credential.clone());
        Ok(())
    }

    fn delete_credential(&self, id: CredentialId) -> StoreResult<()> {
        self.credentials.lock().unwrap().remove(&id);
        Ok(())
    }

    fn list_for_client(&self, client_id: ClientId) -> StoreResult<Vec<Credential>> {
        let mut credentials: Vec<Credential> = self
            .credentials
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.client_id == client_id)
            .cloned()
            .collect();
        credentials.sort_by_key(|c| c.id);
        Ok(credentials)
    }

    fn append_audit(&self, entry: &AuditEntry) -> StoreResult<()> {
        if *self.fail_audit.lock().unwrap() {
            return Err(StoreError::Backend("injected audit failure".to_string()));
        }
        self.audits.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// A session with nobody logged in.
pub struct Anonymous;

impl Session for Anonymous {
    fn current_principal(&self) -> Option<Principal> {
        None
    }
}
