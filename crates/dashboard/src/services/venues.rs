//! Guarded venue operations for the owner and admin surfaces.
//!
//! Every operation re-derives authorization for the specific venue it
//! touches; nothing trusts a role resolved earlier in the request.
//! Owner-scoped denials use the deliberately ambiguous wording so a caller
//! cannot probe which venue IDs exist.

use std::sync::Arc;

use buzzvar_core::{VenueId, VenueImageId, VenueRole};

use crate::db::{EventStore, OwnershipStore, RepositoryError, ReviewStore, VenueStore};
use crate::error::AppError;
use crate::models::{
    CurrentPrincipal, NewVenue, OwnershipRecord, Review, Venue, VenueImage, VenueUpdate,
};
use crate::services::identity::RoleResolver;

/// Longest accepted venue name.
const MAX_NAME_LENGTH: usize = 120;

/// Reviews shown on the owner dashboard.
const TOP_REVIEW_LIMIT: i64 = 5;

#[derive(Clone)]
pub struct VenueService {
    roles: RoleResolver,
    venues: Arc<dyn VenueStore>,
    ownership: Arc<dyn OwnershipStore>,
    events: Arc<dyn EventStore>,
    reviews: Arc<dyn ReviewStore>,
}

impl VenueService {
    #[must_use]
    pub fn new(
        roles: RoleResolver,
        venues: Arc<dyn VenueStore>,
        ownership: Arc<dyn OwnershipStore>,
        events: Arc<dyn EventStore>,
        reviews: Arc<dyn ReviewStore>,
    ) -> Self {
        Self {
            roles,
            venues,
            ownership,
            events,
            reviews,
        }
    }

    /// Ownership check for owner-scoped operations. Absent record and
    /// absent venue collapse into the same ambiguous denial.
    async fn guard_owned(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
    ) -> Result<Venue, AppError> {
        if self.ownership.find(principal.id, venue_id).await?.is_none() {
            return Err(AppError::venue_access_denied());
        }
        self.venues
            .get(venue_id)
            .await?
            .ok_or_else(AppError::venue_access_denied)
    }

    /// All venues the principal holds an ownership record for.
    ///
    /// # Errors
    ///
    /// Storage failures only; an ownerless principal gets an empty list.
    pub async fn venues_for_owner(
        &self,
        principal: &CurrentPrincipal,
    ) -> Result<Vec<Venue>, AppError> {
        let records = self.ownership.list_for_user(principal.id).await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<VenueId> = records.iter().map(|r| r.venue_id).collect();
        Ok(self.venues.get_many(&ids).await?)
    }

    /// One owned venue.
    ///
    /// # Errors
    ///
    /// `AccessDenied` when the venue is absent or not owned by the caller.
    pub async fn venue_for_owner(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
    ) -> Result<Venue, AppError> {
        self.guard_owned(principal, venue_id).await
    }

    /// Create a venue and make the caller its owner.
    ///
    /// The venue insert and the ownership insert are two statements with no
    /// transaction across them (the ownership table belongs to the external
    /// backend's schema). When the ownership insert fails, the fresh venue
    /// is removed by a compensating delete before the error is returned, so
    /// no orphaned venue without an owner is left behind.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty or over-long name, storage failures
    /// otherwise.
    pub async fn create_venue(
        &self,
        principal: &CurrentPrincipal,
        mut new_venue: NewVenue,
    ) -> Result<Venue, AppError> {
        new_venue.name = validate_name(&new_venue.name)?;

        let venue = self.venues.insert(&new_venue).await?;
        let record = OwnershipRecord {
            user_id: principal.id,
            venue_id: venue.id,
            venue_role: VenueRole::Owner,
        };
        if let Err(err) = self.ownership.insert(&record).await {
            if let Err(cleanup) = self.venues.delete(venue.id).await {
                tracing::error!(
                    venue_id = %venue.id,
                    error = %cleanup,
                    "compensating venue delete failed; venue left without owner record"
                );
            }
            return Err(err.into());
        }
        Ok(venue)
    }

    /// Apply a partial update to a venue. Allowed for the venue's owner or
    /// for an admin-level principal.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty patch or bad name, `AccessDenied` without
    /// ownership or admin role, storage failures otherwise.
    pub async fn update_venue(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
        mut update: VenueUpdate,
    ) -> Result<Venue, AppError> {
        if update.is_empty() {
            return Err(AppError::Validation {
                field: "update".to_owned(),
                message: "no fields to update".to_owned(),
            });
        }
        if let Some(name) = update.name.take() {
            update.name = Some(validate_name(&name)?);
        }

        if self.ownership.find(principal.id, venue_id).await?.is_none() {
            // Not the owner; an admin-level role may still edit.
            self.roles
                .require_admin_level(principal)
                .await
                .map_err(|_| AppError::venue_access_denied())?;
        }

        match self.venues.update(venue_id, &update).await {
            Ok(venue) => Ok(venue),
            Err(RepositoryError::NotFound) => Err(AppError::venue_access_denied()),
            Err(err) => Err(err.into()),
        }
    }

    /// Page of all venues, for the admin venue table.
    ///
    /// # Errors
    ///
    /// `AccessDenied` for non-admin principals.
    pub async fn venues_for_admin(
        &self,
        principal: &CurrentPrincipal,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Venue>, i64), AppError> {
        self.roles.require_admin_level(principal).await?;
        let (venues, total) = tokio::join!(self.venues.list(limit, offset), self.venues.count());
        Ok((venues?, total?))
    }

    /// Ownership records of one venue, for the admin venue table.
    ///
    /// # Errors
    ///
    /// `AccessDenied` for non-admins, `NotFound` for an unknown venue.
    pub async fn venue_owners(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
    ) -> Result<Vec<OwnershipRecord>, AppError> {
        self.roles.require_admin_level(principal).await?;
        if self.venues.get(venue_id).await?.is_none() {
            return Err(AppError::NotFound("Venue not found".to_owned()));
        }
        Ok(self.ownership.list_for_venue(venue_id).await?)
    }

    /// Set the verification flag. Admin-level; idempotent.
    ///
    /// # Errors
    ///
    /// `AccessDenied` for non-admins, `NotFound` for an unknown venue.
    pub async fn set_verified(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
        verified: bool,
    ) -> Result<Venue, AppError> {
        self.roles.require_admin_level(principal).await?;
        match self.venues.set_verified(venue_id, verified).await {
            Ok(venue) => Ok(venue),
            Err(RepositoryError::NotFound) => Err(AppError::NotFound("Venue not found".to_owned())),
            Err(err) => Err(err.into()),
        }
    }

    /// Toggle the venue's active flag.
    ///
    /// Always fails `Unavailable`: the backing column is absent from the
    /// deployed schema. The role check still runs first so the endpoint
    /// leaks nothing to non-admins.
    ///
    /// # Errors
    ///
    /// `AccessDenied` for non-admins, `Unavailable` otherwise.
    pub async fn set_active(
        &self,
        principal: &CurrentPrincipal,
        _venue_id: VenueId,
        _active: bool,
    ) -> Result<(), AppError> {
        self.roles.require_admin_level(principal).await?;
        Err(AppError::Unavailable(
            "venue active status is not supported by the current deployment".to_owned(),
        ))
    }

    /// Delete a venue. Admin-level, and refused while any event row still
    /// references the venue, whatever the event's own active flag says.
    ///
    /// # Errors
    ///
    /// `AccessDenied` for non-admins, `NotFound` for an unknown venue,
    /// `Validation` while events reference the venue.
    pub async fn delete_venue(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
    ) -> Result<(), AppError> {
        self.roles.require_admin_level(principal).await?;
        if self.venues.get(venue_id).await?.is_none() {
            return Err(AppError::NotFound("Venue not found".to_owned()));
        }
        if self.events.count_for_venue(venue_id).await? > 0 {
            return Err(AppError::Validation {
                field: "events".to_owned(),
                message: "Cannot delete venue with active events".to_owned(),
            });
        }
        self.venues.delete(venue_id).await?;
        Ok(())
    }

    /// Highest-rated reviews of an owned venue, for the owner dashboard.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without ownership.
    pub async fn top_reviews(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
    ) -> Result<Vec<Review>, AppError> {
        self.guard_owned(principal, venue_id).await?;
        Ok(self.reviews.top_for_venue(venue_id, TOP_REVIEW_LIMIT).await?)
    }

    /// Images of an owned venue, oldest first.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without ownership.
    pub async fn list_images(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
    ) -> Result<Vec<VenueImage>, AppError> {
        self.guard_owned(principal, venue_id).await?;
        Ok(self.venues.list_images(venue_id).await?)
    }

    /// Attach an already-uploaded image URL to an owned venue. The URL is
    /// produced by the file storage collaborator and stored verbatim.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without ownership.
    pub async fn add_image(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
        url: &str,
        caption: Option<&str>,
        kind: Option<&str>,
    ) -> Result<VenueImage, AppError> {
        self.guard_owned(principal, venue_id).await?;
        Ok(self.venues.insert_image(venue_id, url, caption, kind).await?)
    }

    /// Remove an image from an owned venue. The delete is scoped to the
    /// venue, so an image ID belonging to another venue cannot be removed
    /// through this venue's route.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without ownership, `NotFound` for an unknown image.
    pub async fn remove_image(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
        image_id: VenueImageId,
    ) -> Result<(), AppError> {
        self.guard_owned(principal, venue_id).await?;
        match self.venues.delete_image(venue_id, image_id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(AppError::NotFound("Image not found".to_owned())),
            Err(err) => Err(err.into()),
        }
    }
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation {
            field: "name".to_owned(),
            message: "name must not be empty".to_owned(),
        });
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation {
            field: "name".to_owned(),
            message: format!("name must be at most {MAX_NAME_LENGTH} characters"),
        });
    }
    Ok(name.to_owned())
}
