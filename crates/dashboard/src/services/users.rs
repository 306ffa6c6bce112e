//! Guarded user and admin-record management.
//!
//! Self-targeting protections run before any storage call: a principal can
//! never delete their own account or touch their own admin record, however
//! elevated their role.

use std::sync::Arc;

use buzzvar_core::UserId;

use crate::db::{AdminUserStore, RepositoryError, UserStore};
use crate::error::AppError;
use crate::models::{AdminUserRecord, CurrentPrincipal, UserAccount};
use crate::services::identity::RoleResolver;

#[derive(Clone)]
pub struct UserAdminService {
    roles: RoleResolver,
    users: Arc<dyn UserStore>,
    admin_users: Arc<dyn AdminUserStore>,
}

impl UserAdminService {
    #[must_use]
    pub fn new(
        roles: RoleResolver,
        users: Arc<dyn UserStore>,
        admin_users: Arc<dyn AdminUserStore>,
    ) -> Self {
        Self {
            roles,
            users,
            admin_users,
        }
    }

    /// Page of user accounts with the overall total.
    ///
    /// # Errors
    ///
    /// `AccessDenied` for non-admin principals.
    pub async fn list_users(
        &self,
        principal: &CurrentPrincipal,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<UserAccount>, i64), AppError> {
        self.roles.require_admin_level(principal).await?;
        let (users, total) = tokio::join!(self.users.list(limit, offset), self.users.count());
        Ok((users?, total?))
    }

    /// One user account.
    ///
    /// # Errors
    ///
    /// `AccessDenied` for non-admins, `NotFound` for an unknown user.
    pub async fn get_user(
        &self,
        principal: &CurrentPrincipal,
        user_id: UserId,
    ) -> Result<UserAccount, AppError> {
        self.roles.require_admin_level(principal).await?;
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_owned()))
    }

    /// Delete a user account. Self-deletion is refused before the user
    /// store is touched.
    ///
    /// # Errors
    ///
    /// `Validation` when targeting yourself, `AccessDenied` for
    /// non-admins, `NotFound` for an unknown user.
    pub async fn delete_user(
        &self,
        principal: &CurrentPrincipal,
        user_id: UserId,
    ) -> Result<(), AppError> {
        if user_id == principal.id {
            return Err(AppError::Validation {
                field: "user_id".to_owned(),
                message: "Cannot delete your own account".to_owned(),
            });
        }
        self.roles.require_admin_level(principal).await?;
        match self.users.delete(user_id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(AppError::NotFound("User not found".to_owned())),
            Err(err) => Err(err.into()),
        }
    }

    /// Toggle a user's active flag.
    ///
    /// Always fails `Unavailable`: the deployed `users` table carries no
    /// such column.
    ///
    /// # Errors
    ///
    /// `AccessDenied` for non-admins, `Unavailable` otherwise.
    pub async fn set_user_active(
        &self,
        principal: &CurrentPrincipal,
        _user_id: UserId,
        _active: bool,
    ) -> Result<(), AppError> {
        self.roles.require_admin_level(principal).await?;
        Err(AppError::Unavailable(
            "user active status is not supported by the current deployment".to_owned(),
        ))
    }

    /// All admin records.
    ///
    /// In the current deployment the backing table is absent, so this
    /// surfaces the `Unavailable` failure rather than an empty list.
    ///
    /// # Errors
    ///
    /// `AccessDenied` for non-admins, `Unavailable` while the table is
    /// missing.
    pub async fn list_admin_users(
        &self,
        principal: &CurrentPrincipal,
    ) -> Result<Vec<AdminUserRecord>, AppError> {
        self.roles.require_admin_level(principal).await?;
        Ok(self.admin_users.list().await?)
    }

    /// Deactivate the admin record of `target`. Targets are addressed by
    /// the backing user ID, which is what makes the self-check possible
    /// without a prior read.
    ///
    /// # Errors
    ///
    /// `Validation` when targeting yourself, `AccessDenied` for
    /// non-admins, `NotFound` for a user without an admin record,
    /// `Unavailable` while the table is missing.
    pub async fn deactivate_admin(
        &self,
        principal: &CurrentPrincipal,
        target: UserId,
    ) -> Result<(), AppError> {
        self.guard_admin_target(principal, target, "Cannot deactivate your own admin account")
            .await?;
        let record = self.require_admin_record(target).await?;
        if !record.active {
            // Already inactive; deactivation is idempotent.
            return Ok(());
        }
        self.admin_users.set_active(record.id, false).await?;
        Ok(())
    }

    /// Delete the admin record of `target`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::deactivate_admin`].
    pub async fn delete_admin(
        &self,
        principal: &CurrentPrincipal,
        target: UserId,
    ) -> Result<(), AppError> {
        self.guard_admin_target(principal, target, "Cannot delete your own admin account")
            .await?;
        let record = self.require_admin_record(target).await?;
        self.admin_users.delete(record.id).await?;
        Ok(())
    }

    /// Self-check first, role check second; the admin store is only
    /// reached when both pass.
    async fn guard_admin_target(
        &self,
        principal: &CurrentPrincipal,
        target: UserId,
        self_message: &str,
    ) -> Result<(), AppError> {
        if target == principal.id {
            return Err(AppError::Validation {
                field: "user_id".to_owned(),
                message: self_message.to_owned(),
            });
        }
        self.roles.require_admin_level(principal).await?;
        Ok(())
    }

    async fn require_admin_record(&self, target: UserId) -> Result<AdminUserRecord, AppError> {
        self.admin_users
            .find_by_user(target)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin record not found".to_owned()))
    }
}
