//! Authenticated-session boundary.

use covault_types::Principal;

/// Supplies the current principal for a request.
///
/// Absence of a principal is an immediate authorization failure — the vault
/// checks this before any other logic runs.
pub trait Session {
    fn current_principal(&self) -> Option<Principal>;
}

/// A bare principal is a valid session (useful for internal callers and
/// tests; HTTP layers adapt their own session type instead).
impl Session for Principal {
    fn current_principal(&self) -> Option<Principal> {
        Some(self.clone())
    }
}
