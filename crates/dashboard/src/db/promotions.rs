//! Promotion repository: the `promotions` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use buzzvar_core::{PromotionId, VenueId};

use super::RepositoryError;
use crate::models::{NewPromotion, Promotion, PromotionUpdate};

/// Internal row type for `promotions` queries.
#[derive(Debug, sqlx::FromRow)]
struct PromotionRow {
    id: PromotionId,
    venue_id: VenueId,
    title: String,
    description: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<PromotionRow> for Promotion {
    fn from(row: PromotionRow) -> Self {
        Self {
            id: row.id,
            venue_id: row.venue_id,
            title: row.title,
            description: row.description,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            created_at: row.created_at,
        }
    }
}

/// Access to venue promotions.
#[async_trait]
pub trait PromotionStore: Send + Sync {
    /// Promotions of a venue, newest first.
    async fn list_for_venue(&self, venue_id: VenueId) -> Result<Vec<Promotion>, RepositoryError>;

    /// Point lookup by promotion ID.
    async fn get(&self, id: PromotionId) -> Result<Option<Promotion>, RepositoryError>;

    /// Insert a new promotion for the venue and return it.
    async fn insert(
        &self,
        venue_id: VenueId,
        promotion: &NewPromotion,
    ) -> Result<Promotion, RepositoryError>;

    /// Apply a partial update and return the updated promotion.
    async fn update(
        &self,
        id: PromotionId,
        update: &PromotionUpdate,
    ) -> Result<Promotion, RepositoryError>;

    /// Delete a promotion.
    async fn delete(&self, id: PromotionId) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed [`PromotionStore`].
pub struct PgPromotionStore {
    pool: PgPool,
}

impl PgPromotionStore {
    /// Create a new promotion store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PROMOTION_COLUMNS: &str =
    "id, venue_id, title, description, starts_at, ends_at, created_at";

#[async_trait]
impl PromotionStore for PgPromotionStore {
    async fn list_for_venue(&self, venue_id: VenueId) -> Result<Vec<Promotion>, RepositoryError> {
        let rows = sqlx::query_as::<_, PromotionRow>(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions WHERE venue_id = $1 ORDER BY created_at DESC"
        ))
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "promotions"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: PromotionId) -> Result<Option<Promotion>, RepositoryError> {
        let row = sqlx::query_as::<_, PromotionRow>(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "promotions"))?;

        Ok(row.map(Into::into))
    }

    async fn insert(
        &self,
        venue_id: VenueId,
        promotion: &NewPromotion,
    ) -> Result<Promotion, RepositoryError> {
        let row = sqlx::query_as::<_, PromotionRow>(&format!(
            r"
            INSERT INTO promotions (venue_id, title, description, starts_at, ends_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PROMOTION_COLUMNS}
            "
        ))
        .bind(venue_id)
        .bind(&promotion.title)
        .bind(&promotion.description)
        .bind(promotion.starts_at)
        .bind(promotion.ends_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "promotions"))?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: PromotionId,
        update: &PromotionUpdate,
    ) -> Result<Promotion, RepositoryError> {
        let row = sqlx::query_as::<_, PromotionRow>(&format!(
            r"
            UPDATE promotions
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                starts_at = COALESCE($4, starts_at),
                ends_at = COALESCE($5, ends_at)
            WHERE id = $1
            RETURNING {PROMOTION_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.starts_at)
        .bind(update.ends_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "promotions"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, id: PromotionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "promotions"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
