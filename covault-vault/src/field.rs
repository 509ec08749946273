//! Secret field classification.
//!
//! An update payload's secret field carries four distinct intents that a raw
//! optional string conflates: the field was omitted, the caller cleared the
//! secret, the caller echoed the mask back unchanged, or the caller typed a
//! new value. The classification happens exactly once, at the request
//! boundary, and the rest of the subsystem only ever sees this closed
//! enumeration.

use covault_crypto::is_masked;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A caller-submitted secret field, classified.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum SecretInput {
    /// Field absent from the payload — leave the stored secret unchanged.
    #[default]
    Omitted,
    /// Empty string or explicit null — clear the stored secret.
    Cleared,
    /// Exactly the masking sentinel — the caller redisplayed the mask
    /// without editing it; leave the stored secret unchanged.
    Masked,
    /// A new plaintext to encrypt and store.
    Value(String),
}

impl SecretInput {
    /// Classifies a raw optional field value. `None` means the field was
    /// omitted from the payload.
    pub fn from_submitted(field: Option<String>) -> Self {
        match field {
            None => Self::Omitted,
            Some(value) => Self::classify(value),
        }
    }

    fn classify(value: String) -> Self {
        if value.is_empty() {
            Self::Cleared
        } else if is_masked(&value) {
            Self::Masked
        } else {
            Self::Value(value)
        }
    }
}

impl fmt::Debug for SecretInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Submitted plaintext never appears in logs
        match self {
            Self::Omitted => f.write_str("Omitted"),
            Self::Cleared => f.write_str("Cleared"),
            Self::Masked => f.write_str("Masked"),
            Self::Value(_) => f.write_str("Value(<redacted>)"),
        }
    }
}

/// A present field deserializes by classification; JSON `null` clears, like
/// the empty string. An absent field never reaches the deserializer — the
/// containing struct's `#[serde(default)]` yields [`SecretInput::Omitted`].
impl<'de> Deserialize<'de> for SecretInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Self::Cleared),
            Some(value) => Ok(Self::classify(value)),
        }
    }
}
