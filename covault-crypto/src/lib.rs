//! Encryption layer for Covault.
//!
//! Provides at-rest encryption for stored credential secrets using:
//! - Argon2id for deriving the process-wide key from the configured secret
//! - ChaCha20-Poly1305 for authenticated encryption
//! - A stable three-segment hex envelope as the persisted form
//!
//! # Architecture
//!
//! A single 32-byte [`VaultKey`] is derived once at process startup and is
//! immutable for the process lifetime. Every secret is sealed into an
//! [`Envelope`] with a fresh random nonce, so encrypting the same plaintext
//! twice never produces the same stored value. The Poly1305 tag is verified
//! before any plaintext is released.
//!
//! This crate knows nothing about credentials, owners, or sessions — it is a
//! pure transform between plaintext strings and envelopes. The masking
//! sentinel lives here as well because it is the read-side projection of
//! "an envelope exists".

mod cipher;
mod envelope;
mod error;
mod key;
mod mask;

pub use cipher::{decrypt_secret, encrypt_secret, NONCE_SIZE, TAG_SIZE};
pub use envelope::Envelope;
pub use error::{CryptoError, CryptoResult};
pub use key::{derive_vault_key, derive_vault_key_with, KdfParams, VaultKey, KEY_SIZE};
pub use mask::{is_masked, mask_secret, SECRET_MASK};
