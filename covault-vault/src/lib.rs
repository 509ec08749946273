//! Credential vault subsystem for Covault.
//!
//! Stores third-party credentials (FTP, admin panels, service logins) on
//! behalf of client records. Plaintext secrets are never stored, never
//! returned from read paths (callers see a fixed mask instead), and never
//! re-encrypted when a caller echoes the mask back unchanged.
//!
//! # Architecture
//!
//! - [`SecretInput`] classifies a submitted secret field exactly once at the
//!   request boundary: omitted, cleared, mask echoed, or new value.
//! - [`reconcile_secret`] turns that classification plus the previously
//!   stored envelope into the next stored state.
//! - [`CredentialVault`] is the authorization and audit gate: it owns the
//!   process key, checks the principal → client → credential ownership chain
//!   before every operation, and is the only code path in the system that
//!   decrypts. Every successful reveal is paired with an audit append.
//!
//! The record store and the authenticated session are external collaborators,
//! reached through the [`RecordStore`] and [`Session`] traits.

mod config;
mod error;
mod field;
mod model;
mod reconcile;
mod session;
mod store;
mod vault;

pub use config::VaultConfig;
pub use error::{VaultError, VaultResult};
pub use field::SecretInput;
pub use model::{Credential, CredentialUpdate, CredentialView, NewCredential};
pub use reconcile::reconcile_secret;
pub use session::Session;
pub use store::{AuditEntry, RecordStore, StoreError, StoreResult};
pub use vault::CredentialVault;
