//! The single-admin gate.
//!
//! One boolean question protects every mutation entry point: is the caller
//! the administrator? The check runs server-side on each call; a client-side
//! check alone is never trusted.

use subtle::ConstantTimeEq;

pub trait AdminGate: Send + Sync {
    fn is_admin(&self, token: &str) -> bool;
}

/// Gate backed by one configured shared secret, compared in constant time.
///
/// An empty configured token locks the gate entirely rather than accepting
/// empty submissions.
pub struct TokenAdminGate {
    token: String,
}

impl TokenAdminGate {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AdminGate for TokenAdminGate {
    fn is_admin(&self, token: &str) -> bool {
        if self.token.is_empty() {
            return false;
        }
        if self.token.len() != token.len() {
            return false;
        }
        self.token.as_bytes().ct_eq(token.as_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_the_exact_token() {
        let gate = TokenAdminGate::new("correct-horse");
        assert!(gate.is_admin("correct-horse"));
        assert!(!gate.is_admin("correct-horsf"));
        assert!(!gate.is_admin("correct"));
        assert!(!gate.is_admin(""));
    }

    #[test]
    fn empty_configured_token_locks_the_gate() {
        let gate = TokenAdminGate::new("");
        assert!(!gate.is_admin(""));
        assert!(!gate.is_admin("anything"));
    }
}
