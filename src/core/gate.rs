//! Secret-gated authorization for destructive ledger mutations.
//!
//! Deleting a payment entry is irreversible, so it requires a shared secret
//! on top of whatever role-based authorization the calling application
//! enforces. The gate is constructed once at process start from
//! configuration; nothing reads the environment at call time.

use crate::config::AppConfig;
use crate::errors::{Error, Result};

/// Authorization gate for destructive deletions.
#[derive(Debug, Clone)]
pub struct DeletionGate {
    secret: Option<String>,
}

impl DeletionGate {
    /// Builds a gate around a configured secret. `None` denies everything.
    #[must_use]
    pub const fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    /// Builds a gate from the loaded application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.delete_secret.clone())
    }

    /// Whether the supplied secret matches the configured one.
    ///
    /// An unconfigured gate always denies. The comparison runs in constant
    /// time over the supplied bytes.
    #[must_use]
    pub fn authorize_destroy(&self, supplied: &str) -> bool {
        match &self.secret {
            Some(secret) => constant_time_eq(secret.as_bytes(), supplied.as_bytes()),
            None => false,
        }
    }

    /// Errors with `Unauthorized` unless the supplied secret matches.
    pub fn require(&self, supplied: &str) -> Result<()> {
        if self.secret.is_none() {
            return Err(Error::Unauthorized {
                message: "deletion secret is not configured".to_string(),
            });
        }
        if !self.authorize_destroy(supplied) {
            return Err(Error::Unauthorized {
                message: "deletion secret does not match".to_string(),
            });
        }
        Ok(())
    }
}

/// Byte comparison that does not short-circuit on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_gate_denies() {
        let gate = DeletionGate::new(None);
        assert!(!gate.authorize_destroy("anything"));
        assert!(matches!(
            gate.require("anything"),
            Err(Error::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_wrong_secret_denied() {
        let gate = DeletionGate::new(Some("correct-horse".to_string()));
        assert!(!gate.authorize_destroy("battery-staple"));
        assert!(matches!(
            gate.require("battery-staple"),
            Err(Error::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_correct_secret_allowed() {
        let gate = DeletionGate::new(Some("correct-horse".to_string()));
        assert!(gate.authorize_destroy("correct-horse"));
        assert!(gate.require("correct-horse").is_ok());
    }

    #[test]
    fn test_empty_supplied_secret_denied() {
        let gate = DeletionGate::new(Some("secret".to_string()));
        assert!(!gate.authorize_destroy(""));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }
}
