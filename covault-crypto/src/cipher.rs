//! ChaCha20-Poly1305 sealing and opening of secret strings.

use crate::envelope::Envelope;
use crate::error::{CryptoError, CryptoResult};
use crate::key::VaultKey;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};

/// ChaCha20 nonce size in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Seals a plaintext secret into an [`Envelope`] with a fresh random nonce.
///
/// Encrypting the same plaintext twice yields different envelopes. The empty
/// string means "no secret" and is never encrypted — callers convert empty
/// input to "no value" before reaching this function, so an empty plaintext
/// here is a caller bug and fails the write.
pub fn encrypt_secret(key: &VaultKey, plaintext: &str) -> CryptoResult<Envelope> {
    if plaintext.is_empty() {
        return Err(CryptoError::Cipher(
            "refusing to encrypt an empty secret".to_string(),
        ));
    }

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

    let mut sealed = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| CryptoError::Cipher(e.to_string()))?;

    // The aead output is ciphertext || tag; the envelope stores them apart
    let tag_bytes = sealed.split_off(sealed.len() - TAG_SIZE);
    let mut tag = [0u8; TAG_SIZE];
    tag.copy_from_slice(&tag_bytes);

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    nonce_bytes.copy_from_slice(&nonce);

    Ok(Envelope::new(nonce_bytes, tag, sealed))
}

/// Opens an [`Envelope`], verifying the Poly1305 tag before releasing any
/// plaintext.
///
/// Fails with [`CryptoError::Authentication`] when the tag does not verify —
/// tampered data or a key mismatch. No plaintext is ever returned on a
/// failed verification.
pub fn decrypt_secret(key: &VaultKey, envelope: &Envelope) -> CryptoResult<String> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

    let mut sealed = Vec::with_capacity(envelope.ciphertext().len() + TAG_SIZE);
    sealed.extend_from_slice(envelope.ciphertext());
    sealed.extend_from_slice(envelope.tag());

    let plaintext = cipher
        .decrypt(Nonce::from_slice(envelope.nonce()), sealed.as_slice())
        .map_err(|_| CryptoError::Authentication)?;

    String::from_utf8(plaintext)
        .map_err(|_| CryptoError::CorruptEnvelope("plaintext is not valid UTF-8".to_string()))
}
