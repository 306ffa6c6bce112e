//! Review moderation for admin-level principals and moderators.

use std::sync::Arc;

use buzzvar_core::{ReviewId, VenueId};

use crate::db::{RepositoryError, ReviewStore};
use crate::error::AppError;
use crate::models::{CurrentPrincipal, Review};
use crate::services::identity::RoleResolver;

/// Default size of the moderation queue page.
const DEFAULT_QUEUE_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct ModerationService {
    roles: RoleResolver,
    reviews: Arc<dyn ReviewStore>,
}

impl ModerationService {
    #[must_use]
    pub fn new(roles: RoleResolver, reviews: Arc<dyn ReviewStore>) -> Self {
        Self { roles, reviews }
    }

    /// The moderation queue: most recent reviews across all venues.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without the moderation capability.
    pub async fn recent_reviews(
        &self,
        principal: &CurrentPrincipal,
        limit: Option<i64>,
    ) -> Result<Vec<Review>, AppError> {
        self.roles.require_moderation(principal).await?;
        let limit = limit.unwrap_or(DEFAULT_QUEUE_LIMIT).clamp(1, 200);
        Ok(self.reviews.list_recent(limit).await?)
    }

    /// Recent reviews of one venue.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without the moderation capability.
    pub async fn venue_reviews(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
        limit: Option<i64>,
    ) -> Result<Vec<Review>, AppError> {
        self.roles.require_moderation(principal).await?;
        let limit = limit.unwrap_or(DEFAULT_QUEUE_LIMIT).clamp(1, 200);
        Ok(self.reviews.list_for_venue(venue_id, limit).await?)
    }

    /// Remove a review.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without the moderation capability, `NotFound` for an
    /// unknown review.
    pub async fn remove_review(
        &self,
        principal: &CurrentPrincipal,
        review_id: ReviewId,
    ) -> Result<(), AppError> {
        self.roles.require_moderation(principal).await?;
        match self.reviews.delete(review_id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => {
                Err(AppError::NotFound("Review not found".to_owned()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
