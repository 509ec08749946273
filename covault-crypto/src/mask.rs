//! The masking sentinel.
//!
//! Read paths never return a secret, only a fixed placeholder. The sentinel
//! is content-independent: it never varies with the underlying secret's
//! length or content, and it is never persisted. Update paths use
//! [`is_masked`] to detect a caller echoing the placeholder back unchanged —
//! that check is exact equality and nothing else.

use crate::envelope::Envelope;

/// Fixed 8-character placeholder shown in place of a stored secret.
pub const SECRET_MASK: &str = "••••••••";

/// Read-time projection of a stored secret: the sentinel when one exists,
/// nothing when it does not.
pub fn mask_secret(secret: Option<&Envelope>) -> Option<&'static str> {
    secret.map(|_| SECRET_MASK)
}

/// Whether a submitted value is exactly the sentinel.
///
/// A user-typed value that happens to equal the sentinel is indistinguishable
/// from the true sentinel; anything else — prefix, suffix, near-miss — is an
/// ordinary value.
pub fn is_masked(candidate: &str) -> bool {
    candidate == SECRET_MASK
}
