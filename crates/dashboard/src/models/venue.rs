//! Venue domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use buzzvar_core::{UserId, VenueId, VenueImageId, VenueRole};

/// A venue profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    /// Unique venue ID.
    pub id: VenueId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Whether an admin has verified this venue.
    ///
    /// The upstream schema also describes an `active` flag, but the column
    /// is absent from the deployed database, so it is not part of the read
    /// model and the active-status toggle is a structured no-op failure.
    pub verified: bool,
    /// When the venue was created.
    pub created_at: DateTime<Utc>,
    /// When the venue was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a venue.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVenue {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

/// Partial venue update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenueUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl VenueUpdate {
    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.address.is_none()
            && self.city.is_none()
    }
}

/// Join entity linking a principal to a venue they may administer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipRecord {
    /// The owning/managing user.
    pub user_id: UserId,
    /// The venue being administered.
    pub venue_id: VenueId,
    /// The principal's role within this venue.
    pub venue_role: VenueRole,
}

/// An image attached to a venue.
///
/// The URL comes from the external file storage collaborator; the dashboard
/// stores it verbatim and performs no transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueImage {
    pub id: VenueImageId,
    pub venue_id: VenueId,
    /// Retrievable URL returned by the file storage collaborator.
    pub url: String,
    pub caption: Option<String>,
    /// Free-form tag such as "cover" or "gallery".
    pub kind: Option<String>,
    pub created_at: DateTime<Utc>,
}
