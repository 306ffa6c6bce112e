//! Admin area: venue administration and review moderation.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use buzzvar_core::{ReviewId, VenueId};

use crate::middleware::RequirePrincipal;
use crate::models::{OwnershipRecord, Review, Venue};
use crate::routes::{ApiResult, ApiSuccess, Pagination};
use crate::state::AppState;

/// Paged venue listing.
#[derive(Debug, Serialize)]
pub struct VenueListing {
    pub venues: Vec<Venue>,
    pub total: i64,
}

/// # Errors
///
/// `AccessDenied` for non-admin principals.
#[instrument(skip(state, principal))]
pub async fn list_venues(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Query(pagination): Query<Pagination>,
) -> ApiResult<VenueListing> {
    state.roles.require_admin_level(&principal).await?;
    let (limit, offset) = pagination.clamped();
    let (venues, total) = state
        .venues
        .venues_for_admin(&principal, limit, offset)
        .await?;
    Ok(ApiSuccess::new(VenueListing { venues, total }))
}

/// Ownership records of one venue, showing who may administer it.
///
/// # Errors
///
/// `AccessDenied` for non-admins, `NotFound` for an unknown venue.
#[instrument(skip(state, principal), fields(venue_id = %id))]
pub async fn venue_owners(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
) -> ApiResult<Vec<OwnershipRecord>> {
    state.roles.require_admin_level(&principal).await?;
    let owners = state.venues.venue_owners(&principal, id).await?;
    Ok(ApiSuccess::new(owners))
}

#[derive(Debug, Deserialize)]
pub struct SetVerifiedBody {
    pub verified: bool,
}

/// Set a venue's verification flag.
///
/// # Errors
///
/// `AccessDenied` for non-admins, `NotFound` for an unknown venue.
#[instrument(skip(state, principal, body), fields(venue_id = %id))]
pub async fn set_verified(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
    Json(body): Json<SetVerifiedBody>,
) -> ApiResult<Venue> {
    state.roles.require_admin_level(&principal).await?;
    let venue = state
        .venues
        .set_verified(&principal, id, body.verified)
        .await?;
    state
        .page_cache
        .invalidate_prefix(&format!("/owner/venues/{id}"));
    Ok(ApiSuccess::new(venue))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveBody {
    pub active: bool,
}

/// Toggle a venue's active flag - a structured no-op in this deployment.
///
/// # Errors
///
/// Always `Unavailable` once authorized.
#[instrument(skip(state, principal, body), fields(venue_id = %id))]
pub async fn set_active(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
    Json(body): Json<SetActiveBody>,
) -> ApiResult<()> {
    state.roles.require_admin_level(&principal).await?;
    state.venues.set_active(&principal, id, body.active).await?;
    Ok(ApiSuccess::new(()))
}

/// Delete a venue, refused while any event references it.
///
/// # Errors
///
/// `AccessDenied` for non-admins, `NotFound` for an unknown venue,
/// `Validation` while events reference it.
#[instrument(skip(state, principal), fields(venue_id = %id))]
pub async fn delete_venue(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
) -> ApiResult<()> {
    state.roles.require_admin_level(&principal).await?;
    state.venues.delete_venue(&principal, id).await?;
    state
        .page_cache
        .invalidate_prefix(&format!("/owner/venues/{id}"));
    state.page_cache.invalidate("/super-admin/overview").await;
    Ok(ApiSuccess::new(()))
}

/// Recent reviews of one venue.
///
/// # Errors
///
/// `AccessDenied` without the moderation capability.
#[instrument(skip(state, principal), fields(venue_id = %id))]
pub async fn venue_reviews(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Vec<Review>> {
    state.roles.require_moderation(&principal).await?;
    let (limit, _) = pagination.clamped();
    let reviews = state
        .moderation
        .venue_reviews(&principal, id, Some(limit))
        .await?;
    Ok(ApiSuccess::new(reviews))
}

/// The moderation queue.
///
/// # Errors
///
/// `AccessDenied` without the moderation capability.
#[instrument(skip(state, principal))]
pub async fn recent_reviews(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Vec<Review>> {
    state.roles.require_moderation(&principal).await?;
    let (limit, _) = pagination.clamped();
    let reviews = state
        .moderation
        .recent_reviews(&principal, Some(limit))
        .await?;
    Ok(ApiSuccess::new(reviews))
}

/// Remove a review.
///
/// # Errors
///
/// `AccessDenied` without the moderation capability, `NotFound` for an
/// unknown review.
#[instrument(skip(state, principal), fields(review_id = %id))]
pub async fn remove_review(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<ReviewId>,
) -> ApiResult<()> {
    state.roles.require_moderation(&principal).await?;
    state.moderation.remove_review(&principal, id).await?;
    Ok(ApiSuccess::new(()))
}
