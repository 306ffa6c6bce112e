//! User account domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use buzzvar_core::{AdminRecordId, Email, Role, UserId};

/// A user account as seen by the admin screens.
///
/// Merges `users` with the optional `user_profiles` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: Email,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A row of the `admin_users` table.
///
/// This table is the intended canonical role store but is absent from the
/// current deployment; every read surfaces a missing-table failure and role
/// resolution falls back to the configured email lists. The type is kept so
/// the screens and the store trait are ready the day the table lands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserRecord {
    pub id: AdminRecordId,
    pub user_id: UserId,
    pub role: Role,
    /// Free-form permission blob carried by the backend. Decorative
    /// metadata only: enforcement always goes through
    /// `Permissions::for_role`.
    pub permissions: serde_json::Value,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
