//! Storage repositories over the hosted backend's `PostgreSQL` schema.
//!
//! The schema belongs to the external backend; the dashboard never migrates
//! it and cannot assume every table it models is deployed. Queries are
//! therefore issued at runtime (not compile-time checked) and an
//! `undefined_table` error maps to [`RepositoryError::MissingTable`], which
//! callers surface as an expected, structured failure rather than a bug.
//!
//! # Tables
//!
//! - `users`, `user_profiles` - consumer accounts
//! - `venues`, `venue_owners`, `venue_images` - venue profiles and ownership
//! - `events`, `promotions`, `reviews` - venue content
//! - `venue_analytics`, `system_analytics`, `user_interactions` - read-only
//!   counters written by the analytics pipeline
//! - `admin_users` - intended role store, ABSENT in the current deployment
//!
//! Each repository is an object-safe trait with a `PostgreSQL`
//! implementation, so the guarded services can be exercised against
//! in-memory fakes in tests.

pub mod admin_users;
pub mod analytics;
pub mod events;
pub mod ownership;
pub mod promotions;
pub mod reviews;
pub mod users;
pub mod venues;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::{AdminUserStore, PgAdminUserStore};
pub use analytics::{AnalyticsStore, PgAnalyticsStore};
pub use events::{EventStore, PgEventStore};
pub use ownership::{OwnershipStore, PgOwnershipStore};
pub use promotions::{PgPromotionStore, PromotionStore};
pub use reviews::{PgReviewStore, ReviewStore};
pub use users::{PgUserStore, UserStore};
pub use venues::{PgVenueStore, VenueStore};

/// `PostgreSQL` SQLSTATE for `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";

/// `PostgreSQL` SQLSTATE for `undefined_column`.
const UNDEFINED_COLUMN: &str = "42703";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// A table the read model describes is not present in the deployed
    /// schema. Expected for `admin_users`; callers treat this as a normal
    /// failure mode, not something to retry.
    #[error("table {0} does not exist in the deployed schema")]
    MissingTable(&'static str),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate ownership record).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map an sqlx error for a query against `table`, folding
    /// `undefined_table`/`undefined_column` into [`Self::MissingTable`].
    fn from_sqlx(err: sqlx::Error, table: &'static str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && let Some(code) = db_err.code()
            && (code == UNDEFINED_TABLE || code == UNDEFINED_COLUMN)
        {
            return Self::MissingTable(table);
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_display() {
        let err = RepositoryError::MissingTable("admin_users");
        assert_eq!(
            err.to_string(),
            "table admin_users does not exist in the deployed schema"
        );
    }
}
