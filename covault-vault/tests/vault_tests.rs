//! End-to-end vault behavior against the in-memory store double.

mod support;

use covault_crypto::{encrypt_secret, Envelope, VaultKey, SECRET_MASK};
use covault_types::{ClientId, CredentialId, Principal};
use covault_vault::{
    CredentialUpdate, CredentialVault, NewCredential, RecordStore, SecretInput, VaultError,
};
use pretty_assertions::assert_eq;
use support::{Anonymous, MemoryStore};

fn vault() -> CredentialVault<MemoryStore> {
    CredentialVault::new(VaultKey::from_bytes([0x07; 32]), MemoryStore::new())
}

fn new_credential(client_id: ClientId, secret: Option<&str>) -> NewCredential {
    NewCredential {
        client_id,
        kind: "FTP".to_string(),
        display_name: Some("prod server".to_string()),
        url: Some("ftp://files.example.com".to_string()),
        username: Some("deploy".to_string()),
        port: Some(21),
        notes: None,
        secret: secret.map(str::to_string),
    }
}

// ── Create ──

#[test]
fn create_encrypts_the_initial_secret() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);

    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();

    let stored = vault.store().stored_secret_text(created.id).unwrap();
    assert!(!stored.contains("hunter2"));
    // Well-formed envelope at rest, never plaintext
    stored.parse::<Envelope>().unwrap();
}

#[test]
fn create_with_empty_secret_stores_no_value() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);

    let created = vault.create(&alice, new_credential(client, Some(""))).unwrap();

    assert!(created.secret.is_none());
    assert_eq!(vault.store().stored_secret_text(created.id), None);
}

#[test]
fn create_without_secret_stores_no_value() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);

    let created = vault.create(&alice, new_credential(client, None)).unwrap();

    assert!(created.secret.is_none());
}

#[test]
fn create_requires_a_kind() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);

    let mut new = new_credential(client, None);
    new.kind = "  ".to_string();

    let result = vault.create(&alice, new);
    assert!(matches!(result, Err(VaultError::InvalidKind)));
}

#[test]
fn create_for_a_foreign_client_is_not_found() {
    let vault = vault();
    let alice = Principal::new("alice");
    let mallory = Principal::new("mallory");
    let client = vault.store().add_client(&alice);

    let result = vault.create(&mallory, new_credential(client, Some("x")));
    assert!(matches!(result, Err(VaultError::NotFound)));
}

#[test]
fn create_without_a_session_is_rejected_first() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);

    let result = vault.create(&Anonymous, new_credential(client, Some("x")));
    assert!(matches!(result, Err(VaultError::Unauthenticated)));
}

// ── Read Paths Are Masked ──

#[test]
fn list_shows_the_sentinel_never_the_secret() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);

    vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();
    let mut without = new_credential(client, None);
    without.kind = "ADMIN_PANEL".to_string();
    vault.create(&alice, without).unwrap();

    let views = vault.list_for_client(&alice, client).unwrap();
    assert_eq!(views.len(), 2);

    let ftp = views.iter().find(|v| v.kind == "FTP").unwrap();
    let admin = views.iter().find(|v| v.kind == "ADMIN_PANEL").unwrap();
    assert_eq!(ftp.secret, Some(SECRET_MASK));
    assert_eq!(admin.secret, None);

    let rendered = serde_json::to_string(&views).unwrap();
    assert!(!rendered.contains("hunter2"));
}

#[test]
fn get_masks_identically_for_short_and_long_secrets() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);

    let short = vault.create(&alice, new_credential(client, Some("a"))).unwrap();
    let long = vault
        .create(&alice, new_credential(client, Some("a very long secret value")))
        .unwrap();

    let short_view = vault.get(&alice, short.id).unwrap();
    let long_view = vault.get(&alice, long.id).unwrap();
    assert_eq!(short_view.secret, long_view.secret);
    assert_eq!(short_view.secret, Some(SECRET_MASK));
}

#[test]
fn list_of_a_foreign_client_is_not_found() {
    let vault = vault();
    let alice = Principal::new("alice");
    let mallory = Principal::new("mallory");
    let client = vault.store().add_client(&alice);

    let result = vault.list_for_client(&mallory, client);
    assert!(matches!(result, Err(VaultError::NotFound)));
}

// ── Update Reconciliation ──

#[test]
fn echoing_the_mask_preserves_the_stored_envelope() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();
    let before = vault.store().stored_secret_text(created.id).unwrap();

    let update = CredentialUpdate {
        secret: SecretInput::from_submitted(Some(SECRET_MASK.to_string())),
        ..Default::default()
    };
    vault.update(&alice, created.id, update).unwrap();

    assert_eq!(vault.store().stored_secret_text(created.id).unwrap(), before);
    assert_eq!(vault.reveal(&alice, created.id).unwrap(), "hunter2");
}

#[test]
fn empty_submission_clears_the_stored_secret() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();

    let update = CredentialUpdate {
        secret: SecretInput::from_submitted(Some(String::new())),
        ..Default::default()
    };
    let updated = vault.update(&alice, created.id, update).unwrap();

    assert!(updated.secret.is_none());
    let result = vault.reveal(&alice, created.id);
    assert!(matches!(result, Err(VaultError::NoSecret)));
}

#[test]
fn new_value_rotates_the_stored_secret() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();
    let before = vault.store().stored_secret_text(created.id).unwrap();

    let update = CredentialUpdate {
        secret: SecretInput::from_submitted(Some("newpass".to_string())),
        ..Default::default()
    };
    vault.update(&alice, created.id, update).unwrap();

    assert_ne!(vault.store().stored_secret_text(created.id).unwrap(), before);
    assert_eq!(vault.reveal(&alice, created.id).unwrap(), "newpass");
}

#[test]
fn metadata_update_leaves_the_envelope_untouched() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();
    let before = vault.store().stored_secret_text(created.id).unwrap();

    let update = CredentialUpdate {
        display_name: Some("renamed".to_string()),
        notes: Some("rotated quarterly".to_string()),
        ..Default::default()
    };
    let updated = vault.update(&alice, created.id, update).unwrap();

    assert_eq!(updated.display_name.as_deref(), Some("renamed"));
    assert_eq!(updated.username.as_deref(), Some("deploy"));
    assert_eq!(vault.store().stored_secret_text(created.id).unwrap(), before);
}

#[test]
fn update_cannot_blank_the_kind() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault.create(&alice, new_credential(client, None)).unwrap();

    let update = CredentialUpdate {
        kind: Some(String::new()),
        ..Default::default()
    };
    let result = vault.update(&alice, created.id, update);
    assert!(matches!(result, Err(VaultError::InvalidKind)));
}

#[test]
fn update_by_non_owner_is_not_found() {
    let vault = vault();
    let alice = Principal::new("alice");
    let mallory = Principal::new("mallory");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();

    let update = CredentialUpdate {
        secret: SecretInput::from_submitted(Some("stolen".to_string())),
        ..Default::default()
    };
    let result = vault.update(&mallory, created.id, update);
    assert!(matches!(result, Err(VaultError::NotFound)));

    // And the stored secret is untouched
    assert_eq!(vault.reveal(&alice, created.id).unwrap(), "hunter2");
}

// ── Reveal: Authorization, Audit, Failure Translation ──

#[test]
fn reveal_returns_plaintext_and_audits_exactly_once() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();

    assert_eq!(vault.reveal(&alice, created.id).unwrap(), "hunter2");

    let audits = vault.store().audit_entries();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].principal, alice);
    assert_eq!(audits[0].credential_id, created.id);
    assert_eq!(audits[0].client_id, client);
    assert_eq!(audits[0].kind, "FTP");
}

#[test]
fn each_reveal_appends_its_own_audit_entry() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();

    vault.reveal(&alice, created.id).unwrap();
    vault.reveal(&alice, created.id).unwrap();

    assert_eq!(vault.store().audit_entries().len(), 2);
}

#[test]
fn non_owner_and_nonexistent_report_identically() {
    let vault = vault();
    let alice = Principal::new("alice");
    let mallory = Principal::new("mallory");
    let client = vault.store().add_client(&alice);
    vault.store().add_client(&mallory);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();

    let foreign = vault.reveal(&mallory, created.id).unwrap_err();
    let missing = vault.reveal(&mallory, CredentialId::new()).unwrap_err();

    assert!(matches!(foreign, VaultError::NotFound));
    assert!(matches!(missing, VaultError::NotFound));
    assert_eq!(foreign.to_string(), missing.to_string());
    // A denied reveal is not audited
    assert!(vault.store().audit_entries().is_empty());
}

#[test]
fn reveal_without_a_session_is_rejected_before_anything_else() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();

    let result = vault.reveal(&Anonymous, created.id);
    assert!(matches!(result, Err(VaultError::Unauthenticated)));
    assert!(vault.store().audit_entries().is_empty());
}

#[test]
fn reveal_of_a_secretless_credential_is_no_secret() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault.create(&alice, new_credential(client, None)).unwrap();

    let result = vault.reveal(&alice, created.id);
    assert!(matches!(result, Err(VaultError::NoSecret)));
    assert!(vault.store().audit_entries().is_empty());
}

#[test]
fn undecryptable_secret_surfaces_without_cipher_detail() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();

    // Simulate an at-rest value sealed under a different key
    let mut broken = created.clone();
    broken.secret =
        Some(encrypt_secret(&VaultKey::from_bytes([0x13; 32]), "hunter2").unwrap());
    vault.store().save_credential(&broken).unwrap();

    let result = vault.reveal(&alice, created.id);
    assert!(matches!(result, Err(VaultError::DecryptionUnavailable)));
    // A failed reveal is not audited
    assert!(vault.store().audit_entries().is_empty());
}

#[test]
fn audit_failure_does_not_block_the_reveal() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();

    vault.store().fail_audits();

    assert_eq!(vault.reveal(&alice, created.id).unwrap(), "hunter2");
    assert!(vault.store().audit_entries().is_empty());
}

// ── Delete ──

#[test]
fn delete_hard_removes_credential_and_ciphertext() {
    let vault = vault();
    let alice = Principal::new("alice");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();

    vault.delete(&alice, created.id).unwrap();

    assert_eq!(vault.store().stored_secret_text(created.id), None);
    let result = vault.get(&alice, created.id);
    assert!(matches!(result, Err(VaultError::NotFound)));
}

#[test]
fn delete_by_non_owner_is_not_found() {
    let vault = vault();
    let alice = Principal::new("alice");
    let mallory = Principal::new("mallory");
    let client = vault.store().add_client(&alice);
    let created = vault
        .create(&alice, new_credential(client, Some("hunter2")))
        .unwrap();

    let result = vault.delete(&mallory, created.id);
    assert!(matches!(result, Err(VaultError::NotFound)));
    assert_eq!(vault.reveal(&alice, created.id).unwrap(), "hunter2");
}
