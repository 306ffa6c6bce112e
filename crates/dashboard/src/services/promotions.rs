//! Owner-scoped promotion management.
//!
//! Every operation is guarded by the ownership lookup for the venue in the
//! path; the promotion store is never reached by a non-owner. A promotion
//! ID that belongs to a different venue gets the same ambiguous denial as
//! a foreign venue.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use buzzvar_core::{PromotionId, VenueId};

use crate::db::{OwnershipStore, PromotionStore};
use crate::error::AppError;
use crate::models::{CurrentPrincipal, NewPromotion, Promotion, PromotionUpdate};

/// Longest accepted promotion title.
const MAX_TITLE_LENGTH: usize = 120;

#[derive(Clone)]
pub struct PromotionService {
    promotions: Arc<dyn PromotionStore>,
    ownership: Arc<dyn OwnershipStore>,
}

impl PromotionService {
    #[must_use]
    pub fn new(promotions: Arc<dyn PromotionStore>, ownership: Arc<dyn OwnershipStore>) -> Self {
        Self {
            promotions,
            ownership,
        }
    }

    async fn guard_owned(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
    ) -> Result<(), AppError> {
        if self.ownership.find(principal.id, venue_id).await?.is_none() {
            return Err(AppError::venue_access_denied());
        }
        Ok(())
    }

    /// A promotion of the guarded venue, or the ambiguous denial.
    async fn require_promotion(
        &self,
        venue_id: VenueId,
        promotion_id: PromotionId,
    ) -> Result<Promotion, AppError> {
        let promotion = self
            .promotions
            .get(promotion_id)
            .await?
            .filter(|p| p.venue_id == venue_id)
            .ok_or_else(AppError::venue_access_denied)?;
        Ok(promotion)
    }

    /// Promotions of an owned venue, newest first.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without ownership.
    pub async fn list(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
    ) -> Result<Vec<Promotion>, AppError> {
        self.guard_owned(principal, venue_id).await?;
        Ok(self.promotions.list_for_venue(venue_id).await?)
    }

    /// Create a promotion on an owned venue.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without ownership, `Validation` for a bad title or
    /// an inverted date window.
    pub async fn create(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
        mut promotion: NewPromotion,
    ) -> Result<Promotion, AppError> {
        self.guard_owned(principal, venue_id).await?;
        promotion.title = validate_title(&promotion.title)?;
        validate_window(promotion.starts_at, promotion.ends_at)?;
        Ok(self.promotions.insert(venue_id, &promotion).await?)
    }

    /// Apply a partial update to a promotion of an owned venue. Window
    /// validation runs against the effective window, so moving only one
    /// end cannot invert it.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without ownership or for a foreign promotion,
    /// `Validation` for a bad title or an inverted window.
    pub async fn update(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
        promotion_id: PromotionId,
        mut update: PromotionUpdate,
    ) -> Result<Promotion, AppError> {
        self.guard_owned(principal, venue_id).await?;
        let existing = self.require_promotion(venue_id, promotion_id).await?;

        if let Some(title) = update.title.take() {
            update.title = Some(validate_title(&title)?);
        }
        let starts_at = update.starts_at.unwrap_or(existing.starts_at);
        let ends_at = update.ends_at.unwrap_or(existing.ends_at);
        validate_window(starts_at, ends_at)?;

        Ok(self.promotions.update(promotion_id, &update).await?)
    }

    /// Delete a promotion of an owned venue.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without ownership or for a foreign promotion.
    pub async fn delete(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
        promotion_id: PromotionId,
    ) -> Result<(), AppError> {
        self.guard_owned(principal, venue_id).await?;
        self.require_promotion(venue_id, promotion_id).await?;
        self.promotions.delete(promotion_id).await?;
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation {
            field: "title".to_owned(),
            message: "title must not be empty".to_owned(),
        });
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation {
            field: "title".to_owned(),
            message: format!("title must be at most {MAX_TITLE_LENGTH} characters"),
        });
    }
    Ok(title.to_owned())
}

fn validate_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<(), AppError> {
    if ends_at <= starts_at {
        return Err(AppError::Validation {
            field: "ends_at".to_owned(),
            message: "promotion must end after it starts".to_owned(),
        });
    }
    Ok(())
}
