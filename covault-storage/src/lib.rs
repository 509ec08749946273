//! DuckDB record store for Covault.
//!
//! Persists client ownership, credentials (with the secret envelope in its
//! canonical string form), and the append-only reveal audit log. Implements
//! the `RecordStore` boundary consumed by `covault-vault`.

mod credential_store;

pub use credential_store::CredentialStore;
