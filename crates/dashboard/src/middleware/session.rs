//! Session middleware configuration.
//!
//! `PostgreSQL`-backed sessions via tower-sessions with strict settings:
//! SameSite=Strict, HttpOnly, 24 hour inactivity expiry, Secure whenever
//! the dashboard is served over HTTPS.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::DashboardConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bv_dashboard_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with a `PostgreSQL` store.
///
/// The session table lives in its own `dashboard` schema so the session
/// machinery never collides with the backend-owned public schema. The
/// store's own migration runs here; it only touches that schema.
///
/// # Errors
///
/// Returns an error if the session schema/table cannot be created.
///
/// # Panics
///
/// Panics if the schema or table name is invalid (cannot happen with the
/// hardcoded values).
pub async fn create_session_layer(
    pool: &PgPool,
    config: &DashboardConfig,
) -> Result<SessionManagerLayer<PostgresStore>, sqlx::Error> {
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("dashboard")
        .expect("valid schema name")
        .with_table_name("session")
        .expect("valid table name");
    store.migrate().await?;

    let is_secure = config.base_url.starts_with("https://");

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/"))
}
