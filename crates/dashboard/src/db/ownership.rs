//! Ownership repository: the `venue_owners` join table.
//!
//! The point lookup here is the hot path of every owner-scoped
//! authorization check, so it is kept to a single indexed query.

use async_trait::async_trait;
use sqlx::PgPool;

use buzzvar_core::{UserId, VenueId, VenueRole};

use super::RepositoryError;
use crate::models::OwnershipRecord;

/// Internal row type for `venue_owners` queries.
#[derive(Debug, sqlx::FromRow)]
struct OwnershipRow {
    user_id: UserId,
    venue_id: VenueId,
    role: String,
}

impl TryFrom<OwnershipRow> for OwnershipRecord {
    type Error = RepositoryError;

    fn try_from(row: OwnershipRow) -> Result<Self, Self::Error> {
        let venue_role = VenueRole::from_db(&row.role).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("invalid venue role in database: {}", row.role))
        })?;

        Ok(Self {
            user_id: row.user_id,
            venue_id: row.venue_id,
            venue_role,
        })
    }
}

/// Access to ownership records linking principals to venues.
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    /// Point lookup of the record linking `user_id` to `venue_id`.
    async fn find(
        &self,
        user_id: UserId,
        venue_id: VenueId,
    ) -> Result<Option<OwnershipRecord>, RepositoryError>;

    /// Whether the user holds at least one ownership record.
    async fn any_for_user(&self, user_id: UserId) -> Result<bool, RepositoryError>;

    /// All ownership records held by a user.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OwnershipRecord>, RepositoryError>;

    /// All owners/managers/staff of a venue.
    async fn list_for_venue(
        &self,
        venue_id: VenueId,
    ) -> Result<Vec<OwnershipRecord>, RepositoryError>;

    /// Insert a new ownership record.
    async fn insert(&self, record: &OwnershipRecord) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed [`OwnershipStore`].
pub struct PgOwnershipStore {
    pool: PgPool,
}

impl PgOwnershipStore {
    /// Create a new ownership store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnershipStore for PgOwnershipStore {
    async fn find(
        &self,
        user_id: UserId,
        venue_id: VenueId,
    ) -> Result<Option<OwnershipRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, OwnershipRow>(
            r"
            SELECT user_id, venue_id, role
            FROM venue_owners
            WHERE user_id = $1 AND venue_id = $2
            ",
        )
        .bind(user_id)
        .bind(venue_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venue_owners"))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn any_for_user(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (SELECT 1 FROM venue_owners WHERE user_id = $1)
            ",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venue_owners"))?;

        Ok(exists)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OwnershipRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, OwnershipRow>(
            r"
            SELECT user_id, venue_id, role
            FROM venue_owners
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venue_owners"))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_for_venue(
        &self,
        venue_id: VenueId,
    ) -> Result<Vec<OwnershipRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, OwnershipRow>(
            r"
            SELECT user_id, venue_id, role
            FROM venue_owners
            WHERE venue_id = $1
            ",
        )
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venue_owners"))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn insert(&self, record: &OwnershipRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO venue_owners (user_id, venue_id, role)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(record.user_id)
        .bind(record.venue_id)
        .bind(record.venue_role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("ownership record already exists".to_owned());
            }
            RepositoryError::from_sqlx(e, "venue_owners")
        })?;

        Ok(())
    }
}
