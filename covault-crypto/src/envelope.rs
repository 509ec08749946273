//! The persisted envelope format.
//!
//! A stored secret is three components joined by a literal `:`, each encoded
//! as lowercase hexadecimal: `<nonce-hex>:<tag-hex>:<ciphertext-hex>`. The
//! delimiter cannot be produced inside a hex segment, so the split is
//! unambiguous. This format is stable for data at rest.

use crate::cipher::{NONCE_SIZE, TAG_SIZE};
use crate::error::CryptoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A sealed secret: nonce, Poly1305 tag, and ciphertext body.
///
/// Only [`encrypt_secret`](crate::encrypt_secret) produces well-formed
/// envelopes; parsing accepts anything matching the stored shape and leaves
/// integrity to the tag check at decryption time.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Envelope {
    nonce: [u8; NONCE_SIZE],
    tag: [u8; TAG_SIZE],
    ciphertext: Vec<u8>,
}

impl Envelope {
    pub(crate) fn new(nonce: [u8; NONCE_SIZE], tag: [u8; TAG_SIZE], ciphertext: Vec<u8>) -> Self {
        Self {
            nonce,
            tag,
            ciphertext,
        }
    }

    pub(crate) fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    pub(crate) fn tag(&self) -> &[u8; TAG_SIZE] {
        &self.tag
    }

    pub(crate) fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            hex::encode(self.nonce),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Envelope").field(&self.to_string()).finish()
    }
}

impl FromStr for Envelope {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(CryptoError::CorruptEnvelope(format!(
                "expected 3 segments, found {}",
                parts.len()
            )));
        }

        let nonce_bytes = hex::decode(parts[0])
            .map_err(|e| CryptoError::CorruptEnvelope(format!("nonce: {e}")))?;
        let nonce: [u8; NONCE_SIZE] = nonce_bytes.try_into().map_err(|v: Vec<u8>| {
            CryptoError::CorruptEnvelope(format!("nonce length {} != {NONCE_SIZE}", v.len()))
        })?;

        let tag_bytes = hex::decode(parts[1])
            .map_err(|e| CryptoError::CorruptEnvelope(format!("tag: {e}")))?;
        let tag: [u8; TAG_SIZE] = tag_bytes.try_into().map_err(|v: Vec<u8>| {
            CryptoError::CorruptEnvelope(format!("tag length {} != {TAG_SIZE}", v.len()))
        })?;

        let ciphertext = hex::decode(parts[2])
            .map_err(|e| CryptoError::CorruptEnvelope(format!("ciphertext: {e}")))?;
        if ciphertext.is_empty() {
            return Err(CryptoError::CorruptEnvelope(
                "empty ciphertext segment".to_string(),
            ));
        }

        Ok(Self {
            nonce,
            tag,
            ciphertext,
        })
    }
}

impl TryFrom<String> for Envelope {
    type Error = CryptoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Envelope> for String {
    fn from(envelope: Envelope) -> Self {
        envelope.to_string()
    }
}
