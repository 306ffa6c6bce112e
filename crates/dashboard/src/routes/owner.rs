//! Owner area: venue CRUD, the venue dashboard, images and promotions.
//!
//! Image uploads arrive as a raw body with the image content type; the
//! blob goes to the file storage collaborator and only the returned URL is
//! persisted.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use buzzvar_core::{PromotionId, VenueId, VenueImageId};

use crate::error::AppError;
use crate::middleware::RequirePrincipal;
use crate::models::{
    CurrentPrincipal, NewPromotion, NewVenue, Promotion, PromotionUpdate, Review, Venue,
    VenueImage, VenueUpdate,
};
use crate::routes::{ApiResult, ApiSuccess};
use crate::services::analytics::EngagementWindows;
use crate::services::{AnalyticsService, PageCache, VenueService};
use crate::state::AppState;

/// Engagement window for the owner dashboard, in days.
const DASHBOARD_WINDOW_DAYS: u32 = 30;

fn venue_prefix(id: VenueId) -> String {
    format!("/owner/venues/{id}")
}

/// All venues owned by the caller.
///
/// # Errors
///
/// Storage failures only.
#[instrument(skip(state, principal))]
pub async fn list_venues(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> ApiResult<Vec<Venue>> {
    let venues = state.venues.venues_for_owner(&principal).await?;
    Ok(ApiSuccess::new(venues))
}

/// Create a venue with the caller as its owner.
///
/// # Errors
///
/// `Validation` for a bad name, storage failures otherwise.
#[instrument(skip(state, principal, body))]
pub async fn create_venue(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Json(body): Json<NewVenue>,
) -> ApiResult<Venue> {
    let venue = state.venues.create_venue(&principal, body).await?;
    state.page_cache.invalidate("/super-admin/overview").await;
    Ok(ApiSuccess::new(venue))
}

/// One owned venue.
///
/// # Errors
///
/// `AccessDenied` when absent or not owned.
#[instrument(skip(state, principal), fields(venue_id = %id))]
pub async fn get_venue(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
) -> ApiResult<Venue> {
    let venue = state.venues.venue_for_owner(&principal, id).await?;
    Ok(ApiSuccess::new(venue))
}

/// Partial update of an owned venue.
///
/// # Errors
///
/// `Validation` for an empty patch, `AccessDenied` without ownership or
/// admin role.
#[instrument(skip(state, principal, body), fields(venue_id = %id))]
pub async fn update_venue(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
    Json(body): Json<VenueUpdate>,
) -> ApiResult<Venue> {
    let venue = state.venues.update_venue(&principal, id, body).await?;
    state.page_cache.invalidate_prefix(&venue_prefix(id));
    Ok(ApiSuccess::new(venue))
}

/// The rendered owner dashboard payload.
#[derive(Debug, Serialize)]
pub struct DashboardPayload {
    pub venue: Venue,
    pub engagement: EngagementWindows,
    pub top_reviews: Vec<Review>,
}

/// Venue profile, engagement windows and top reviews, fetched
/// concurrently and cached by path.
///
/// # Errors
///
/// `AccessDenied` without ownership.
#[instrument(skip(state, principal), fields(venue_id = %id))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
) -> ApiResult<serde_json::Value> {
    let payload = dashboard_view(
        &state.venues,
        &state.analytics,
        &state.page_cache,
        &principal,
        id,
    )
    .await?;
    Ok(ApiSuccess::new(payload))
}

/// Assemble or replay the dashboard payload for one venue.
///
/// The ownership check runs unconditionally before the cache is consulted;
/// a cached payload must never be served to a principal who could not have
/// built it.
async fn dashboard_view(
    venues: &VenueService,
    analytics: &AnalyticsService,
    cache: &PageCache,
    principal: &CurrentPrincipal,
    id: VenueId,
) -> Result<serde_json::Value, AppError> {
    let venue = venues.venue_for_owner(principal, id).await?;

    let path = format!("{}/dashboard", venue_prefix(id));
    if let Some(cached) = cache.get(&path).await {
        return Ok(cached);
    }

    let (engagement, top_reviews) = tokio::join!(
        analytics.venue_engagement(principal, id, DASHBOARD_WINDOW_DAYS),
        venues.top_reviews(principal, id),
    );
    let payload = DashboardPayload {
        venue,
        engagement: engagement?,
        top_reviews: top_reviews?,
    };

    let payload = serde_json::to_value(&payload).map_err(|e| AppError::Internal(e.to_string()))?;
    cache.insert(&path, payload.clone()).await;
    Ok(payload)
}

/// Images of an owned venue.
///
/// # Errors
///
/// `AccessDenied` without ownership.
#[instrument(skip(state, principal), fields(venue_id = %id))]
pub async fn list_images(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
) -> ApiResult<Vec<VenueImage>> {
    let images = state.venues.list_images(&principal, id).await?;
    Ok(ApiSuccess::new(images))
}

/// Caption and kind tag accompanying an image upload.
#[derive(Debug, Deserialize)]
pub struct ImageMeta {
    pub caption: Option<String>,
    pub kind: Option<String>,
}

/// Upload an image blob and attach the resulting URL to the venue.
///
/// # Errors
///
/// `AccessDenied` without ownership, `Validation` for an empty body,
/// upstream failures from the storage collaborator.
#[instrument(skip(state, principal, headers, body), fields(venue_id = %id))]
pub async fn add_image(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
    Query(meta): Query<ImageMeta>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<VenueImage> {
    if body.is_empty() {
        return Err(AppError::Validation {
            field: "file".to_owned(),
            message: "image body must not be empty".to_owned(),
        });
    }
    // Ownership check before the blob leaves the process.
    state.venues.venue_for_owner(&principal, id).await?;

    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");
    let url = state
        .files
        .upload_venue_image(id, body.to_vec(), content_type)
        .await?;

    let image = state
        .venues
        .add_image(
            &principal,
            id,
            &url,
            meta.caption.as_deref(),
            meta.kind.as_deref(),
        )
        .await?;
    state.page_cache.invalidate_prefix(&venue_prefix(id));
    Ok(ApiSuccess::new(image))
}

/// Remove an image from an owned venue.
///
/// # Errors
///
/// `AccessDenied` without ownership, `NotFound` for an unknown image.
#[instrument(skip(state, principal), fields(venue_id = %id, image_id = %image_id))]
pub async fn remove_image(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path((id, image_id)): Path<(VenueId, VenueImageId)>,
) -> ApiResult<()> {
    state.venues.remove_image(&principal, id, image_id).await?;
    state.page_cache.invalidate_prefix(&venue_prefix(id));
    Ok(ApiSuccess::new(()))
}

/// Promotions of an owned venue.
///
/// # Errors
///
/// `AccessDenied` without ownership.
#[instrument(skip(state, principal), fields(venue_id = %id))]
pub async fn list_promotions(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
) -> ApiResult<Vec<Promotion>> {
    let promotions = state.promotions.list(&principal, id).await?;
    Ok(ApiSuccess::new(promotions))
}

/// Create a promotion on an owned venue.
///
/// # Errors
///
/// `AccessDenied` without ownership, `Validation` for a bad title or
/// window.
#[instrument(skip(state, principal, body), fields(venue_id = %id))]
pub async fn create_promotion(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<VenueId>,
    Json(body): Json<NewPromotion>,
) -> ApiResult<Promotion> {
    let promotion = state.promotions.create(&principal, id, body).await?;
    state.page_cache.invalidate_prefix(&venue_prefix(id));
    Ok(ApiSuccess::new(promotion))
}

/// Partial update of a promotion.
///
/// # Errors
///
/// Same taxonomy as [`create_promotion`], plus the ambiguous denial for a
/// promotion of another venue.
#[instrument(skip(state, principal, body), fields(venue_id = %id, promotion_id = %promotion_id))]
pub async fn update_promotion(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path((id, promotion_id)): Path<(VenueId, PromotionId)>,
    Json(body): Json<PromotionUpdate>,
) -> ApiResult<Promotion> {
    let promotion = state
        .promotions
        .update(&principal, id, promotion_id, body)
        .await?;
    state.page_cache.invalidate_prefix(&venue_prefix(id));
    Ok(ApiSuccess::new(promotion))
}

/// Delete a promotion.
///
/// # Errors
///
/// `AccessDenied` without ownership or for a foreign promotion.
#[instrument(skip(state, principal), fields(venue_id = %id, promotion_id = %promotion_id))]
pub async fn delete_promotion(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path((id, promotion_id)): Path<(VenueId, PromotionId)>,
) -> ApiResult<()> {
    state
        .promotions
        .delete(&principal, id, promotion_id)
        .await?;
    state.page_cache.invalidate_prefix(&venue_prefix(id));
    Ok(ApiSuccess::new(()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;

    use super::*;
    use crate::services::testing::{
        FakeAnalyticsStore, FakeEventStore, FakeOwnershipStore, FakeReviewStore, FakeUserStore,
        FakeVenueStore, admin_resolver, owned_venue_for, principal, stored_venue,
    };

    struct Harness {
        venue_service: VenueService,
        analytics: AnalyticsService,
        cache: PageCache,
        venues: Arc<FakeVenueStore>,
        ownership: Arc<FakeOwnershipStore>,
        samples: Arc<FakeAnalyticsStore>,
    }

    fn harness() -> Harness {
        let venues = Arc::new(FakeVenueStore::default());
        let ownership = Arc::new(FakeOwnershipStore::default());
        let events = Arc::new(FakeEventStore::default());
        let samples = Arc::new(FakeAnalyticsStore::default());
        let roles = admin_resolver("ops@buzzvar.app", Arc::clone(&ownership) as _);
        let venue_service = VenueService::new(
            roles.clone(),
            Arc::clone(&venues) as _,
            Arc::clone(&ownership) as _,
            Arc::clone(&events) as _,
            Arc::new(FakeReviewStore::default()),
        );
        let analytics = AnalyticsService::new(
            roles,
            Arc::clone(&samples) as _,
            Arc::clone(&ownership) as _,
            Arc::new(FakeUserStore::default()),
            Arc::clone(&venues) as _,
            events,
        );
        Harness {
            venue_service,
            analytics,
            cache: PageCache::new(),
            venues,
            ownership,
            samples,
        }
    }

    async fn view(
        h: &Harness,
        p: &CurrentPrincipal,
        id: VenueId,
    ) -> Result<serde_json::Value, AppError> {
        dashboard_view(&h.venue_service, &h.analytics, &h.cache, p, id).await
    }

    #[tokio::test]
    async fn test_dashboard_denies_non_owner_even_when_cached() {
        let h = harness();
        let owner = principal("owner@example.com");
        let venue = stored_venue(&h.venues, "The Vault");
        h.ownership.add(owned_venue_for(owner.id, venue.id));

        let payload = view(&h, &owner, venue.id).await.unwrap();
        assert_eq!(payload["venue"]["name"], "The Vault");
        let path = format!("/owner/venues/{}/dashboard", venue.id);
        assert!(h.cache.get(&path).await.is_some());

        // A cached payload must not shortcut the ownership check.
        let stranger = principal("stranger@example.com");
        let err = view(&h, &stranger, venue.id).await.unwrap_err();
        assert!(matches!(err, AppError::AccessDenied(ref msg)
            if msg == crate::error::VENUE_DENIED));
    }

    #[tokio::test]
    async fn test_dashboard_second_owner_view_replays_cache() {
        let h = harness();
        let owner = principal("owner@example.com");
        let venue = stored_venue(&h.venues, "The Vault");
        h.ownership.add(owned_venue_for(owner.id, venue.id));

        view(&h, &owner, venue.id).await.unwrap();
        let after_first = h.samples.calls();
        let replay = view(&h, &owner, venue.id).await.unwrap();
        assert_eq!(replay["venue"]["name"], "The Vault");
        assert_eq!(h.samples.calls(), after_first);
    }
}
