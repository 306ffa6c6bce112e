//! Super-admin area: system overview, user and admin-record management.
//!
//! The area boundary requires the super-admin role; every service call
//! re-derives authorization on top of that, so nothing here trusts the
//! gate alone.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use buzzvar_core::UserId;

use crate::middleware::RequirePrincipal;
use crate::models::{AdminUserRecord, UserAccount};
use crate::routes::{ApiResult, ApiSuccess, Pagination};
use crate::services::analytics::{EngagementWindows, SystemOverview};
use crate::state::AppState;

const OVERVIEW_PATH: &str = "/super-admin/overview";

/// System growth and recent activity, cached by path.
///
/// # Errors
///
/// `AccessDenied` for non-super-admins.
#[instrument(skip(state, principal))]
pub async fn overview(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> ApiResult<serde_json::Value> {
    state.roles.require_super_admin(&principal).await?;

    if let Some(cached) = state.page_cache.get(OVERVIEW_PATH).await {
        return Ok(ApiSuccess::new(cached));
    }

    let overview: SystemOverview = state.analytics.system_overview(&principal).await?;
    let payload = serde_json::to_value(&overview)
        .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;
    state.page_cache.insert(OVERVIEW_PATH, payload.clone()).await;
    Ok(ApiSuccess::new(payload))
}

/// Window length query for the engagement view.
#[derive(Debug, Deserialize)]
pub struct EngagementQuery {
    #[serde(default = "EngagementQuery::default_days")]
    pub days: u32,
}

impl EngagementQuery {
    const fn default_days() -> u32 {
        30
    }
}

/// Platform-wide engagement windows.
///
/// # Errors
///
/// `AccessDenied` for non-super-admins, `Validation` for a zero window.
#[instrument(skip(state, principal))]
pub async fn engagement(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Query(query): Query<EngagementQuery>,
) -> ApiResult<EngagementWindows> {
    let windows = state
        .analytics
        .system_engagement(&principal, query.days)
        .await?;
    Ok(ApiSuccess::new(windows))
}

/// Paged user listing.
#[derive(Debug, Serialize)]
pub struct UserListing {
    pub users: Vec<UserAccount>,
    pub total: i64,
}

/// # Errors
///
/// `AccessDenied` for non-super-admins.
#[instrument(skip(state, principal))]
pub async fn list_users(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Query(pagination): Query<Pagination>,
) -> ApiResult<UserListing> {
    state.roles.require_super_admin(&principal).await?;
    let (limit, offset) = pagination.clamped();
    let (users, total) = state.users.list_users(&principal, limit, offset).await?;
    Ok(ApiSuccess::new(UserListing { users, total }))
}

/// One user account.
///
/// # Errors
///
/// `AccessDenied` for non-super-admins, `NotFound` for an unknown user.
#[instrument(skip(state, principal), fields(target = %id))]
pub async fn get_user(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<UserId>,
) -> ApiResult<UserAccount> {
    state.roles.require_super_admin(&principal).await?;
    let user = state.users.get_user(&principal, id).await?;
    Ok(ApiSuccess::new(user))
}

/// Delete a user account. Self-deletion is refused.
///
/// # Errors
///
/// `Validation` when targeting yourself, `AccessDenied`/`NotFound`
/// otherwise.
#[instrument(skip(state, principal), fields(target = %id))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<UserId>,
) -> ApiResult<()> {
    state.roles.require_super_admin(&principal).await?;
    state.users.delete_user(&principal, id).await?;
    state.page_cache.invalidate(OVERVIEW_PATH).await;
    Ok(ApiSuccess::new(()))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveBody {
    pub active: bool,
}

/// Toggle a user's active flag - a structured no-op in this deployment.
///
/// # Errors
///
/// Always `Unavailable` once authorized.
#[instrument(skip(state, principal, body), fields(target = %id))]
pub async fn set_user_active(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<UserId>,
    Json(body): Json<SetActiveBody>,
) -> ApiResult<()> {
    state.roles.require_super_admin(&principal).await?;
    state
        .users
        .set_user_active(&principal, id, body.active)
        .await?;
    Ok(ApiSuccess::new(()))
}

/// Admin record listing. Surfaces the structured `Unavailable` failure
/// while the backing table is absent.
///
/// # Errors
///
/// `AccessDenied` for non-super-admins, `Unavailable` while the table is
/// missing.
#[instrument(skip(state, principal))]
pub async fn list_admin_users(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> ApiResult<Vec<AdminUserRecord>> {
    state.roles.require_super_admin(&principal).await?;
    let records = state.users.list_admin_users(&principal).await?;
    Ok(ApiSuccess::new(records))
}

/// Deactivate an admin record, addressed by the backing user ID.
///
/// # Errors
///
/// `Validation` when targeting yourself, `Unavailable` while the table is
/// missing.
#[instrument(skip(state, principal), fields(target = %id))]
pub async fn deactivate_admin(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<UserId>,
) -> ApiResult<()> {
    state.roles.require_super_admin(&principal).await?;
    state.users.deactivate_admin(&principal, id).await?;
    Ok(ApiSuccess::new(()))
}

/// Delete an admin record, addressed by the backing user ID.
///
/// # Errors
///
/// Same taxonomy as [`deactivate_admin`].
#[instrument(skip(state, principal), fields(target = %id))]
pub async fn delete_admin(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<UserId>,
) -> ApiResult<()> {
    state.roles.require_super_admin(&principal).await?;
    state.users.delete_admin(&principal, id).await?;
    Ok(ApiSuccess::new(()))
}
