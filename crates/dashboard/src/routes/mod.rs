//! HTTP route handlers for the dashboard JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB ping)
//!
//! # Auth
//! POST /auth/login                      - Verify a backend access token, open a session
//! POST /auth/logout                     - Close the session
//!
//! # Super admin
//! GET    /super-admin/overview          - System growth + recent activity
//! GET    /super-admin/engagement        - Platform engagement windows
//! GET    /super-admin/users             - User listing
//! GET    /super-admin/users/{id}        - One user account
//! DELETE /super-admin/users/{id}        - Delete a user
//! POST   /super-admin/users/{id}/active - Toggle user active (structured no-op)
//! GET    /super-admin/admin-users       - Admin record listing
//! POST   /super-admin/admin-users/{id}/deactivate - Deactivate an admin record
//! DELETE /super-admin/admin-users/{id}  - Delete an admin record
//!
//! # Admin
//! GET    /admin/venues                  - Venue listing
//! POST   /admin/venues/{id}/verify      - Set the verification flag
//! POST   /admin/venues/{id}/active      - Toggle venue active (structured no-op)
//! DELETE /admin/venues/{id}             - Delete a venue (refused with events)
//! GET    /admin/venues/{id}/owners      - Ownership records of one venue
//! GET    /admin/venues/{id}/reviews     - Reviews of one venue
//! GET    /admin/reviews/recent          - Moderation queue
//! DELETE /admin/reviews/{id}            - Remove a review
//!
//! # Owner
//! GET    /owner/venues                  - Owned venues
//! POST   /owner/venues                  - Create a venue (owner record included)
//! GET    /owner/venues/{id}             - One owned venue
//! PATCH  /owner/venues/{id}             - Partial update
//! GET    /owner/venues/{id}/dashboard   - Venue + engagement + top reviews (cached)
//! GET    /owner/venues/{id}/images      - Image listing
//! POST   /owner/venues/{id}/images      - Upload + attach an image
//! DELETE /owner/venues/{id}/images/{image_id} - Remove an image
//! GET    /owner/venues/{id}/promotions  - Promotion listing
//! POST   /owner/venues/{id}/promotions  - Create a promotion
//! PATCH  /owner/venues/{id}/promotions/{promotion_id} - Partial update
//! DELETE /owner/venues/{id}/promotions/{promotion_id} - Delete a promotion
//! ```
//!
//! Success bodies are `{"success": true, "data": ...}`; failures come from
//! [`crate::error::AppError`] as `{"success": false, "error", "code"}`.

pub mod admin;
pub mod auth;
pub mod owner;
pub mod super_admin;

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// Uniform success body: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T> {
    success: bool,
    data: T,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Handler result alias used throughout the route modules.
pub type ApiResult<T> = Result<Json<ApiSuccess<T>>, AppError>;

/// Pagination query parameters with conservative caps.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "Pagination::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl Pagination {
    const fn default_limit() -> i64 {
        50
    }

    /// Limit clamped to a sane page size, offset floored at zero.
    #[must_use]
    pub fn clamped(self) -> (i64, i64) {
        (self.limit.clamp(1, 200), self.offset.max(0))
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the super-admin area router.
pub fn super_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(super_admin::overview))
        .route("/engagement", get(super_admin::engagement))
        .route("/users", get(super_admin::list_users))
        .route(
            "/users/{id}",
            get(super_admin::get_user).delete(super_admin::delete_user),
        )
        .route("/users/{id}/active", post(super_admin::set_user_active))
        .route("/admin-users", get(super_admin::list_admin_users))
        .route(
            "/admin-users/{id}/deactivate",
            post(super_admin::deactivate_admin),
        )
        .route("/admin-users/{id}", delete(super_admin::delete_admin))
}

/// Create the admin area router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/venues", get(admin::list_venues))
        .route("/venues/{id}/verify", post(admin::set_verified))
        .route("/venues/{id}/active", post(admin::set_active))
        .route("/venues/{id}", delete(admin::delete_venue))
        .route("/venues/{id}/owners", get(admin::venue_owners))
        .route("/venues/{id}/reviews", get(admin::venue_reviews))
        .route("/reviews/recent", get(admin::recent_reviews))
        .route("/reviews/{id}", delete(admin::remove_review))
}

/// Create the owner area router.
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/venues", get(owner::list_venues).post(owner::create_venue))
        .route(
            "/venues/{id}",
            get(owner::get_venue).patch(owner::update_venue),
        )
        .route("/venues/{id}/dashboard", get(owner::dashboard))
        .route(
            "/venues/{id}/images",
            get(owner::list_images).post(owner::add_image),
        )
        .route("/venues/{id}/images/{image_id}", delete(owner::remove_image))
        .route(
            "/venues/{id}/promotions",
            get(owner::list_promotions).post(owner::create_promotion),
        )
        .route(
            "/venues/{id}/promotions/{promotion_id}",
            patch(owner::update_promotion).delete(owner::delete_promotion),
        )
}

/// Create all routes for the dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .nest("/auth", auth_routes())
        .nest("/super-admin", super_admin_routes())
        .nest("/admin", admin_routes())
        .nest("/owner", owner_routes())
}

/// Liveness check.
async fn health() -> &'static str {
    "OK"
}

/// Readiness check: pings the database.
async fn ready(State(state): State<AppState>) -> ApiResult<&'static str> {
    sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .map_err(|e| AppError::Database(crate::db::RepositoryError::Database(e)))?;
    Ok(ApiSuccess::new("ready"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_clamps() {
        let (limit, offset) = Pagination {
            limit: 10_000,
            offset: -5,
        }
        .clamped();
        assert_eq!(limit, 200);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_api_success_shape() {
        let Json(body) = ApiSuccess::new(serde_json::json!({"id": 1}));
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["id"], 1);
    }
}
