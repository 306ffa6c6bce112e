//! Role and permission model.
//!
//! Roles are coarse-grained access levels re-derived per request by the
//! dashboard's identity resolver; they are never stored on a session and
//! never trusted across authorization boundaries. Permissions are a pure
//! total function of the role - the per-admin `permissions` JSON blob the
//! hosted backend carries is decorative metadata and is not consulted.

use serde::{Deserialize, Serialize};

/// Access level of a dashboard principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to everything, including user management.
    SuperAdmin,
    /// Venue management and content moderation.
    Admin,
    /// Content moderation only.
    Moderator,
    /// Manages the venues an ownership record links them to.
    ClubOwner,
    /// No dashboard access. Callers must reject this role upstream.
    #[default]
    None,
}

impl Role {
    /// Whether this role grants admin-area access.
    #[must_use]
    pub const fn is_admin_level(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    /// Stable string form used in logs and API payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::ClubOwner => "club_owner",
            Self::None => "none",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a principal holds within a specific venue (on an ownership record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueRole {
    Owner,
    Manager,
    Staff,
}

impl VenueRole {
    /// Stable string form matching the `venue_owners.role` column values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }

    /// Parse a `venue_owners.role` column value.
    #[must_use]
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Self::Owner),
            "manager" => Some(Self::Manager),
            "staff" => Some(Self::Staff),
            _ => None,
        }
    }
}

/// Capability flags granted to a role.
///
/// The mapping is fixed; there are no partial or per-user overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Permissions {
    /// View system-wide analytics dashboards.
    pub view_system_analytics: bool,
    /// Manage (list, deactivate, delete) user accounts.
    pub manage_users: bool,
    /// Manage any venue (verify, delete).
    pub manage_venues: bool,
    /// Moderate user-generated content (reviews).
    pub moderate_content: bool,
    /// Manage venues the principal owns.
    pub manage_own_venues: bool,
}

impl Permissions {
    /// Permissions for a role. Pure and total over the closed [`Role`] enum;
    /// [`Role::None`] maps to all-false.
    #[must_use]
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::SuperAdmin => Self {
                view_system_analytics: true,
                manage_users: true,
                manage_venues: true,
                moderate_content: true,
                manage_own_venues: true,
            },
            Role::Admin => Self {
                view_system_analytics: false,
                manage_users: false,
                manage_venues: true,
                moderate_content: true,
                manage_own_venues: false,
            },
            Role::Moderator => Self {
                view_system_analytics: false,
                manage_users: false,
                manage_venues: false,
                moderate_content: true,
                manage_own_venues: false,
            },
            Role::ClubOwner => Self {
                view_system_analytics: false,
                manage_users: false,
                manage_venues: false,
                moderate_content: false,
                manage_own_venues: true,
            },
            Role::None => Self {
                view_system_analytics: false,
                manage_users: false,
                manage_venues: false,
                moderate_content: false,
                manage_own_venues: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_has_every_permission() {
        let p = Permissions::for_role(Role::SuperAdmin);
        assert!(p.view_system_analytics);
        assert!(p.manage_users);
        assert!(p.manage_venues);
        assert!(p.moderate_content);
        assert!(p.manage_own_venues);
    }

    #[test]
    fn test_admin_manages_venues_and_content_only() {
        let p = Permissions::for_role(Role::Admin);
        assert!(!p.view_system_analytics);
        assert!(!p.manage_users);
        assert!(p.manage_venues);
        assert!(p.moderate_content);
        assert!(!p.manage_own_venues);
    }

    #[test]
    fn test_moderator_moderates_content_only() {
        let p = Permissions::for_role(Role::Moderator);
        assert!(!p.view_system_analytics);
        assert!(!p.manage_users);
        assert!(!p.manage_venues);
        assert!(p.moderate_content);
        assert!(!p.manage_own_venues);
    }

    #[test]
    fn test_club_owner_manages_own_venues_only() {
        let p = Permissions::for_role(Role::ClubOwner);
        assert!(!p.view_system_analytics);
        assert!(!p.manage_users);
        assert!(!p.manage_venues);
        assert!(!p.moderate_content);
        assert!(p.manage_own_venues);
    }

    #[test]
    fn test_none_has_no_permissions() {
        assert_eq!(Permissions::for_role(Role::None), Permissions::default());
    }

    #[test]
    fn test_permissions_are_pure() {
        for role in [
            Role::SuperAdmin,
            Role::Admin,
            Role::Moderator,
            Role::ClubOwner,
            Role::None,
        ] {
            assert_eq!(Permissions::for_role(role), Permissions::for_role(role));
        }
    }

    #[test]
    fn test_role_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).expect("serialize"),
            "\"super_admin\""
        );
        assert_eq!(
            serde_json::from_str::<Role>("\"club_owner\"").expect("deserialize"),
            Role::ClubOwner
        );
    }

    #[test]
    fn test_venue_role_db_roundtrip() {
        for role in [VenueRole::Owner, VenueRole::Manager, VenueRole::Staff] {
            assert_eq!(VenueRole::from_db(role.as_str()), Some(role));
        }
        assert_eq!(VenueRole::from_db("janitor"), None);
    }
}
