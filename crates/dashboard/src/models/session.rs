//! Session-related types for dashboard authentication.
//!
//! Only the principal's identity lives in the session. The role is
//! deliberately NOT stored: it is re-derived at every authorization boundary
//! so a stale or tampered session can never carry elevated access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use buzzvar_core::{Email, UserId};

/// Session-stored identity of the authenticated caller.
///
/// Produced by verifying a backend-issued access token at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentPrincipal {
    /// Backend-issued user ID.
    pub id: UserId,
    /// The principal's email address (normalized).
    pub email: Email,
    /// When the backing auth session expires. Expired principals are
    /// treated as absent and the caller is sent back to login.
    pub expires_at: DateTime<Utc>,
}

impl CurrentPrincipal {
    /// Whether the backing auth session is still valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

/// Session keys for dashboard authentication data.
pub mod session_keys {
    /// Key for storing the current authenticated principal.
    pub const CURRENT_PRINCIPAL: &str = "current_principal";
}
