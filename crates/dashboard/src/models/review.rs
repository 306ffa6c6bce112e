//! Review domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use buzzvar_core::{ReviewId, UserId, VenueId};

/// A user review of a venue.
///
/// Written by the consumer app; the dashboard reads them for owner
/// dashboards and removes them during moderation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub venue_id: VenueId,
    pub user_id: UserId,
    /// 1-5 star rating.
    pub rating: i16,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}
