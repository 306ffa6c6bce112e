//! Admin user record repository: the `admin_users` table.
//!
//! This table is the intended canonical role store, but it is ABSENT from
//! the current deployment. The queries here are real; against the deployed
//! schema every one of them fails with SQLSTATE 42P01 and surfaces as
//! [`RepositoryError::MissingTable`], which the service layer maps to the
//! expected `FEATURE_UNAVAILABLE` failure. Do not remove this fallback
//! path without confirming the table exists in every environment - role
//! resolution meanwhile runs off the configured email lists.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use buzzvar_core::{AdminRecordId, Role, UserId};

use super::RepositoryError;
use crate::models::AdminUserRecord;

/// Internal row type for `admin_users` queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: AdminRecordId,
    user_id: UserId,
    role: String,
    permissions: serde_json::Value,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<AdminUserRow> for AdminUserRecord {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let role = match row.role.as_str() {
            "super_admin" => Role::SuperAdmin,
            "admin" => Role::Admin,
            "moderator" => Role::Moderator,
            other => {
                return Err(RepositoryError::DataCorruption(format!(
                    "invalid admin role in database: {other}"
                )));
            }
        };

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            role,
            permissions: row.permissions,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

/// Access to admin user records.
#[async_trait]
pub trait AdminUserStore: Send + Sync {
    /// All admin records, newest first.
    async fn list(&self) -> Result<Vec<AdminUserRecord>, RepositoryError>;

    /// Point lookup by the backing user ID.
    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<AdminUserRecord>, RepositoryError>;

    /// Flip the active flag on a record.
    async fn set_active(&self, id: AdminRecordId, active: bool) -> Result<(), RepositoryError>;

    /// Delete a record.
    async fn delete(&self, id: AdminRecordId) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed [`AdminUserStore`].
pub struct PgAdminUserStore {
    pool: PgPool,
}

impl PgAdminUserStore {
    /// Create a new admin user store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminUserStore for PgAdminUserStore {
    async fn list(&self) -> Result<Vec<AdminUserRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, user_id, role, permissions, active, created_at
            FROM admin_users
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "admin_users"))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<AdminUserRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, user_id, role, permissions, active, created_at
            FROM admin_users
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "admin_users"))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn set_active(&self, id: AdminRecordId, active: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE admin_users SET active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "admin_users"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: AdminRecordId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM admin_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "admin_users"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
