//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

/// Session-stored operator identity.
///
/// Present only after the credential gate has opened the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Username the operator logged in with.
    pub username: String,
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in operator.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
