//! Promotion domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use buzzvar_core::{PromotionId, VenueId};

/// A promotion run by a venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub id: PromotionId,
    pub venue_id: VenueId,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a promotion.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPromotion {
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Partial promotion update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromotionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}
