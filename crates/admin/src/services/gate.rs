//! Operator login check.
//!
//! A single configured username and password, compared by exact equality.
//! There is no lockout, hashing, or rate limiting.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Login rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    /// Username or password did not match.
    #[error("Incorrect username or password")]
    Incorrect,
}

/// Holds the operator credentials the admin panel accepts.
#[derive(Clone)]
pub struct CredentialGate {
    username: String,
    password: SecretString,
}

impl std::fmt::Debug for CredentialGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialGate")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl CredentialGate {
    #[must_use]
    pub const fn new(username: String, password: SecretString) -> Self {
        Self { username, password }
    }

    /// Compare submitted credentials against the configured pair.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Incorrect`] unless both values match exactly.
    pub fn check(&self, username: &str, password: &SecretString) -> Result<(), GateError> {
        if username == self.username && password.expose_secret() == self.password.expose_secret() {
            Ok(())
        } else {
            tracing::info!(username, "Admin login rejected");
            Err(GateError::Incorrect)
        }
    }
}
