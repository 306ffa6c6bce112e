//! Event repository: count queries over the `events` table.
//!
//! The dashboard never mutates events; it only counts them for the venue
//! deletion guard and the growth dashboard. The deletion guard counts ALL
//! events referencing the venue, not just active ones - that matches the
//! behaviour the platform has always had, and a pinned test keeps any
//! future narrowing deliberate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use buzzvar_core::VenueId;

use super::RepositoryError;

/// Count access to venue events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Number of event rows referencing the venue, regardless of their
    /// active flag.
    async fn count_for_venue(&self, venue_id: VenueId) -> Result<i64, RepositoryError>;

    /// Total number of events.
    async fn count(&self) -> Result<i64, RepositoryError>;

    /// Number of events created strictly before `cutoff`.
    async fn count_created_before(&self, cutoff: DateTime<Utc>) -> Result<i64, RepositoryError>;
}

/// `PostgreSQL`-backed [`EventStore`].
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Create a new event store over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn count_for_venue(&self, venue_id: VenueId) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events WHERE venue_id = $1")
            .bind(venue_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "events"))
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "events"))
    }

    async fn count_created_before(&self, cutoff: DateTime<Utc>) -> Result<i64, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events WHERE created_at < $1")
            .bind(cutoff)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "events"))
    }
}
