//! Analytics repository: `venue_analytics`, `system_analytics` and
//! `user_interactions`.
//!
//! All three tables are written by the external analytics pipeline and are
//! strictly read-only here.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use buzzvar_core::VenueId;

use super::RepositoryError;
use crate::models::{AnalyticsSample, InteractionEvent};

/// Internal row type for daily analytics samples.
#[derive(Debug, sqlx::FromRow)]
struct SampleRow {
    date: NaiveDate,
    views: i64,
    likes: i64,
    saves: i64,
    shares: i64,
    check_ins: i64,
    review_count: i64,
    average_rating: Option<f64>,
}

impl From<SampleRow> for AnalyticsSample {
    fn from(row: SampleRow) -> Self {
        Self {
            date: row.date,
            views: row.views,
            likes: row.likes,
            saves: row.saves,
            shares: row.shares,
            check_ins: row.check_ins,
            review_count: row.review_count,
            average_rating: row.average_rating,
        }
    }
}

/// Internal row type for `user_interactions` queries.
#[derive(Debug, sqlx::FromRow)]
struct InteractionRow {
    kind: String,
    description: String,
    occurred_at: DateTime<Utc>,
}

impl From<InteractionRow> for InteractionEvent {
    fn from(row: InteractionRow) -> Self {
        Self {
            kind: row.kind,
            description: row.description,
            occurred_at: row.occurred_at,
        }
    }
}

/// Read access to the analytics pipeline's output.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Daily samples for one venue over `[from, to]`, oldest first.
    async fn venue_samples(
        &self,
        venue_id: VenueId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AnalyticsSample>, RepositoryError>;

    /// Daily system-wide samples over `[from, to]`, oldest first.
    async fn system_samples(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AnalyticsSample>, RepositoryError>;

    /// Most recent user interactions (activity feed).
    async fn recent_interactions(&self, limit: i64)
        -> Result<Vec<InteractionEvent>, RepositoryError>;
}

/// `PostgreSQL`-backed [`AnalyticsStore`].
pub struct PgAnalyticsStore {
    pool: PgPool,
}

impl PgAnalyticsStore {
    /// Create a new analytics store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SAMPLE_COLUMNS: &str =
    "date, views, likes, saves, shares, check_ins, review_count, average_rating";

#[async_trait]
impl AnalyticsStore for PgAnalyticsStore {
    async fn venue_samples(
        &self,
        venue_id: VenueId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AnalyticsSample>, RepositoryError> {
        let rows = sqlx::query_as::<_, SampleRow>(&format!(
            r"
            SELECT {SAMPLE_COLUMNS}
            FROM venue_analytics
            WHERE venue_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date ASC
            "
        ))
        .bind(venue_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "venue_analytics"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn system_samples(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AnalyticsSample>, RepositoryError> {
        let rows = sqlx::query_as::<_, SampleRow>(&format!(
            r"
            SELECT {SAMPLE_COLUMNS}
            FROM system_analytics
            WHERE date BETWEEN $1 AND $2
            ORDER BY date ASC
            "
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "system_analytics"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn recent_interactions(
        &self,
        limit: i64,
    ) -> Result<Vec<InteractionEvent>, RepositoryError> {
        let rows = sqlx::query_as::<_, InteractionRow>(
            r"
            SELECT kind, description, occurred_at
            FROM user_interactions
            ORDER BY occurred_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "user_interactions"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
