//! Review repository: the `reviews` table.
//!
//! Reviews are written by the consumer app. The dashboard reads them for
//! moderation queues and owner dashboards, and deletes them during
//! moderation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use buzzvar_core::{ReviewId, UserId, VenueId};

use super::RepositoryError;
use crate::models::Review;

/// Internal row type for `reviews` queries.
#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    venue_id: VenueId,
    user_id: UserId,
    rating: i16,
    body: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            venue_id: row.venue_id,
            user_id: row.user_id,
            rating: row.rating,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

/// Access to venue reviews.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Most recent reviews across all venues (moderation queue).
    async fn list_recent(&self, limit: i64) -> Result<Vec<Review>, RepositoryError>;

    /// Most recent reviews of one venue.
    async fn list_for_venue(
        &self,
        venue_id: VenueId,
        limit: i64,
    ) -> Result<Vec<Review>, RepositoryError>;

    /// Highest-rated reviews of one venue (owner dashboard).
    async fn top_for_venue(
        &self,
        venue_id: VenueId,
        limit: i64,
    ) -> Result<Vec<Review>, RepositoryError>;

    /// Remove a review.
    async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed [`ReviewStore`].
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    /// Create a new review store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const REVIEW_COLUMNS: &str = "id, venue_id, user_id, rating, body, created_at";

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn list_recent(&self, limit: i64) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "reviews"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_for_venue(
        &self,
        venue_id: VenueId,
        limit: i64,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE venue_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(venue_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "reviews"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn top_for_venue(
        &self,
        venue_id: VenueId,
        limit: i64,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE venue_id = $1 ORDER BY rating DESC, created_at DESC LIMIT $2"
        ))
        .bind(venue_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "reviews"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "reviews"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
