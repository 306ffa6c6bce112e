//! User account repository: `users` joined with `user_profiles`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use buzzvar_core::{Email, UserId};

use super::RepositoryError;
use crate::models::UserAccount;

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: String,
    display_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            display_name: row.display_name,
            created_at: row.created_at,
        })
    }
}

/// Access to consumer user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Point lookup by user ID.
    async fn get(&self, id: UserId) -> Result<Option<UserAccount>, RepositoryError>;

    /// Page of accounts, newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UserAccount>, RepositoryError>;

    /// Total number of accounts.
    async fn count(&self) -> Result<i64, RepositoryError>;

    /// Number of accounts created strictly before `cutoff`.
    async fn count_created_before(&self, cutoff: DateTime<Utc>) -> Result<i64, RepositoryError>;

    /// Hard-delete an account.
    async fn delete(&self, id: UserId) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed [`UserStore`].
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_QUERY: &str = r"
    SELECT u.id, u.email, p.display_name, u.created_at
    FROM users u
    LEFT JOIN user_profiles p ON p.user_id = u.id
";

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, id: UserId) -> Result<Option<UserAccount>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{USER_QUERY} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "users"))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UserAccount>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "{USER_QUERY} ORDER BY u.created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "users"))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "users"))
    }

    async fn count_created_before(&self, cutoff: DateTime<Utc>) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE created_at < $1")
            .bind(cutoff)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "users"))
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "users"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
