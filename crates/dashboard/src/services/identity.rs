//! Role resolution for authenticated principals.
//!
//! The role is never stored in the session or cached: every authorization
//! boundary calls [`RoleResolver::resolve`] again, so a revoked admin email
//! or a dropped ownership record takes effect on the next request.
//!
//! The `admin_users` table is the intended canonical role store but is
//! absent from the current deployment, so the configured email allow-lists
//! are the operative source of truth for the two admin tiers. `Moderator`
//! exists in the role model but no principal currently resolves to it.

use std::collections::HashSet;
use std::sync::Arc;

use buzzvar_core::{Email, Permissions, Role};

use crate::db::OwnershipStore;
use crate::error::AppError;
use crate::models::CurrentPrincipal;

/// Derives a [`Role`] for a principal from configuration and ownership data.
#[derive(Clone)]
pub struct RoleResolver {
    super_admins: Arc<HashSet<Email>>,
    admins: Arc<HashSet<Email>>,
    ownership: Arc<dyn OwnershipStore>,
}

impl RoleResolver {
    #[must_use]
    pub fn new(
        super_admins: HashSet<Email>,
        admins: HashSet<Email>,
        ownership: Arc<dyn OwnershipStore>,
    ) -> Self {
        Self {
            super_admins: Arc::new(super_admins),
            admins: Arc::new(admins),
            ownership,
        }
    }

    /// Resolve the principal's role. First match wins:
    ///
    /// 1. email in the super-admin list
    /// 2. email in the admin list
    /// 3. at least one ownership record
    /// 4. [`Role::None`]
    ///
    /// Emails are compared normalized (trimmed, lowercased), which
    /// [`Email::parse`] guarantees by construction. An ownership lookup
    /// failure is propagated, never collapsed into [`Role::None`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] when the ownership lookup fails.
    pub async fn resolve(&self, principal: &CurrentPrincipal) -> Result<Role, AppError> {
        if self.super_admins.contains(&principal.email) {
            return Ok(Role::SuperAdmin);
        }
        if self.admins.contains(&principal.email) {
            return Ok(Role::Admin);
        }
        if self.ownership.any_for_user(principal.id).await? {
            return Ok(Role::ClubOwner);
        }
        Ok(Role::None)
    }

    /// Resolve and demand [`Role::SuperAdmin`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AccessDenied`] for any other role.
    pub async fn require_super_admin(&self, principal: &CurrentPrincipal) -> Result<(), AppError> {
        match self.resolve(principal).await? {
            Role::SuperAdmin => Ok(()),
            _ => Err(AppError::role_denied()),
        }
    }

    /// Resolve and demand an admin-level role (super admin or admin).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AccessDenied`] for any other role.
    pub async fn require_admin_level(
        &self,
        principal: &CurrentPrincipal,
    ) -> Result<Role, AppError> {
        let role = self.resolve(principal).await?;
        if role.is_admin_level() {
            Ok(role)
        } else {
            Err(AppError::role_denied())
        }
    }

    /// Resolve and demand the content-moderation capability, which the
    /// permission table grants to super admins, admins and moderators.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AccessDenied`] when the role lacks it.
    pub async fn require_moderation(&self, principal: &CurrentPrincipal) -> Result<Role, AppError> {
        let role = self.resolve(principal).await?;
        if Permissions::for_role(role).moderate_content {
            Ok(role)
        } else {
            Err(AppError::role_denied())
        }
    }
}
