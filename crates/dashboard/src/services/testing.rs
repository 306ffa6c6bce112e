//! In-memory store fakes and fixture helpers shared by the service tests.
//!
//! The fakes count every trait-method invocation so tests can assert that
//! a guard refused an operation before storage was touched, and can be
//! armed to fail their next call to exercise error propagation.

#![allow(clippy::unwrap_used, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use buzzvar_core::{
    AdminRecordId, Email, PromotionId, ReviewId, Role, UserId, VenueId, VenueImageId, VenueRole,
};

use crate::db::{
    AdminUserStore, AnalyticsStore, EventStore, OwnershipStore, PromotionStore, RepositoryError,
    ReviewStore, UserStore, VenueStore,
};
use crate::models::{
    AdminUserRecord, AnalyticsSample, CurrentPrincipal, InteractionEvent, NewPromotion, NewVenue,
    OwnershipRecord, Promotion, PromotionUpdate, Review, UserAccount, Venue, VenueImage,
    VenueUpdate,
};
use crate::services::identity::RoleResolver;

fn storage_failure() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::PoolClosed)
}

/// A principal with a valid (unexpired) session.
pub fn principal(email: &str) -> CurrentPrincipal {
    CurrentPrincipal {
        id: UserId::from(Uuid::new_v4()),
        email: Email::parse(email).unwrap(),
        expires_at: Utc::now() + chrono::Duration::hours(1),
    }
}

/// An ownership record for `user_id` on a fresh venue ID.
pub fn owned_venue(user_id: UserId) -> OwnershipRecord {
    owned_venue_for(user_id, VenueId::from(Uuid::new_v4()))
}

/// An ownership record for `user_id` on `venue_id`.
pub fn owned_venue_for(user_id: UserId, venue_id: VenueId) -> OwnershipRecord {
    OwnershipRecord {
        user_id,
        venue_id,
        venue_role: VenueRole::Owner,
    }
}

/// A resolver whose admin list contains exactly `admin_email`.
pub fn admin_resolver(
    admin_email: &str,
    ownership: std::sync::Arc<dyn OwnershipStore>,
) -> RoleResolver {
    let admins: HashSet<Email> = [Email::parse(admin_email).unwrap()].into();
    RoleResolver::new(HashSet::new(), admins, ownership)
}

/// A resolver whose super-admin list contains exactly `email`.
pub fn super_resolver(email: &str, ownership: std::sync::Arc<dyn OwnershipStore>) -> RoleResolver {
    let supers: HashSet<Email> = [Email::parse(email).unwrap()].into();
    RoleResolver::new(supers, HashSet::new(), ownership)
}

// =============================================================================
// Ownership
// =============================================================================

#[derive(Default)]
pub struct FakeOwnershipStore {
    records: Mutex<Vec<OwnershipRecord>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl FakeOwnershipStore {
    pub fn add(&self, record: OwnershipRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Arm the store to fail its next call.
    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Number of trait-method invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contains(&self, user_id: UserId, venue_id: VenueId) -> bool {
        self.records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.user_id == user_id && r.venue_id == venue_id)
    }

    fn tick(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(storage_failure());
        }
        Ok(())
    }
}

#[async_trait]
impl OwnershipStore for FakeOwnershipStore {
    async fn find(
        &self,
        user_id: UserId,
        venue_id: VenueId,
    ) -> Result<Option<OwnershipRecord>, RepositoryError> {
        self.tick()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.venue_id == venue_id)
            .cloned())
    }

    async fn any_for_user(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        self.tick()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.user_id == user_id))
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OwnershipRecord>, RepositoryError> {
        self.tick()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_for_venue(
        &self,
        venue_id: VenueId,
    ) -> Result<Vec<OwnershipRecord>, RepositoryError> {
        self.tick()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, record: &OwnershipRecord) -> Result<(), RepositoryError> {
        self.tick()?;
        if self.contains(record.user_id, record.venue_id) {
            return Err(RepositoryError::Conflict(
                "ownership record already exists".to_owned(),
            ));
        }
        self.add(record.clone());
        Ok(())
    }
}

// =============================================================================
// Venues
// =============================================================================

#[derive(Default)]
pub struct FakeVenueStore {
    venues: Mutex<Vec<Venue>>,
    images: Mutex<Vec<VenueImage>>,
    deleted: Mutex<Vec<VenueId>>,
    insert_calls: AtomicUsize,
}

/// Insert a venue fixture directly into the fake and return it.
pub fn stored_venue(store: &FakeVenueStore, name: &str) -> Venue {
    let venue = Venue {
        id: VenueId::from(Uuid::new_v4()),
        name: name.to_owned(),
        description: None,
        address: None,
        city: None,
        verified: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.venues.lock().unwrap().push(venue.clone());
    venue
}

impl FakeVenueStore {
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<VenueId> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl VenueStore for FakeVenueStore {
    async fn get(&self, id: VenueId) -> Result<Option<Venue>, RepositoryError> {
        Ok(self
            .venues
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Venue>, RepositoryError> {
        let venues = self.venues.lock().unwrap();
        Ok(venues
            .iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn get_many(&self, ids: &[VenueId]) -> Result<Vec<Venue>, RepositoryError> {
        Ok(self
            .venues
            .lock()
            .unwrap()
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.venues.lock().unwrap().len() as i64)
    }

    async fn count_created_before(&self, cutoff: DateTime<Utc>) -> Result<i64, RepositoryError> {
        Ok(self
            .venues
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.created_at < cutoff)
            .count() as i64)
    }

    async fn insert(&self, venue: &NewVenue) -> Result<Venue, RepositoryError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let venue = Venue {
            id: VenueId::from(Uuid::new_v4()),
            name: venue.name.clone(),
            description: venue.description.clone(),
            address: venue.address.clone(),
            city: venue.city.clone(),
            verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.venues.lock().unwrap().push(venue.clone());
        Ok(venue)
    }

    async fn update(&self, id: VenueId, update: &VenueUpdate) -> Result<Venue, RepositoryError> {
        let mut venues = self.venues.lock().unwrap();
        let venue = venues
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(name) = &update.name {
            venue.name = name.clone();
        }
        if let Some(description) = &update.description {
            venue.description = Some(description.clone());
        }
        if let Some(address) = &update.address {
            venue.address = Some(address.clone());
        }
        if let Some(city) = &update.city {
            venue.city = Some(city.clone());
        }
        venue.updated_at = Utc::now();
        Ok(venue.clone())
    }

    async fn set_verified(&self, id: VenueId, verified: bool) -> Result<Venue, RepositoryError> {
        let mut venues = self.venues.lock().unwrap();
        let venue = venues
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(RepositoryError::NotFound)?;
        venue.verified = verified;
        Ok(venue.clone())
    }

    async fn delete(&self, id: VenueId) -> Result<(), RepositoryError> {
        let mut venues = self.venues.lock().unwrap();
        let before = venues.len();
        venues.retain(|v| v.id != id);
        if venues.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }

    async fn list_images(&self, venue_id: VenueId) -> Result<Vec<VenueImage>, RepositoryError> {
        Ok(self
            .images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn insert_image(
        &self,
        venue_id: VenueId,
        url: &str,
        caption: Option<&str>,
        kind: Option<&str>,
    ) -> Result<VenueImage, RepositoryError> {
        let image = VenueImage {
            id: VenueImageId::from(Uuid::new_v4()),
            venue_id,
            url: url.to_owned(),
            caption: caption.map(str::to_owned),
            kind: kind.map(str::to_owned),
            created_at: Utc::now(),
        };
        self.images.lock().unwrap().push(image.clone());
        Ok(image)
    }

    async fn delete_image(
        &self,
        venue_id: VenueId,
        image_id: VenueImageId,
    ) -> Result<(), RepositoryError> {
        let mut images = self.images.lock().unwrap();
        let before = images.len();
        images.retain(|i| !(i.id == image_id && i.venue_id == venue_id));
        if images.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// =============================================================================
// Events
// =============================================================================

#[derive(Default)]
pub struct FakeEventStore {
    counts: Mutex<std::collections::HashMap<VenueId, i64>>,
}

impl FakeEventStore {
    pub fn set_count(&self, venue_id: VenueId, count: i64) {
        self.counts.lock().unwrap().insert(venue_id, count);
    }
}

#[async_trait]
impl EventStore for FakeEventStore {
    async fn count_for_venue(&self, venue_id: VenueId) -> Result<i64, RepositoryError> {
        Ok(self
            .counts
            .lock()
            .unwrap()
            .get(&venue_id)
            .copied()
            .unwrap_or(0))
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.counts.lock().unwrap().values().sum())
    }

    async fn count_created_before(&self, _cutoff: DateTime<Utc>) -> Result<i64, RepositoryError> {
        Ok(0)
    }
}

// =============================================================================
// Users
// =============================================================================

#[derive(Default)]
pub struct FakeUserStore {
    users: Mutex<Vec<UserAccount>>,
    deleted: Mutex<Vec<UserId>>,
    calls: AtomicUsize,
}

/// Insert a user fixture directly into the fake and return it.
pub fn stored_user(store: &FakeUserStore, email: &str) -> UserAccount {
    let account = UserAccount {
        id: UserId::from(Uuid::new_v4()),
        email: Email::parse(email).unwrap(),
        display_name: None,
        created_at: Utc::now(),
    };
    store.users.lock().unwrap().push(account.clone());
    account
}

impl FakeUserStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<UserId> {
        self.deleted.lock().unwrap().clone()
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for FakeUserStore {
    async fn get(&self, id: UserId) -> Result<Option<UserAccount>, RepositoryError> {
        self.tick();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UserAccount>, RepositoryError> {
        self.tick();
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        self.tick();
        Ok(self.users.lock().unwrap().len() as i64)
    }

    async fn count_created_before(&self, cutoff: DateTime<Utc>) -> Result<i64, RepositoryError> {
        self.tick();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.created_at < cutoff)
            .count() as i64)
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        self.tick();
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}

// =============================================================================
// Admin users
// =============================================================================

#[derive(Default)]
pub struct FakeAdminUserStore {
    records: Mutex<Vec<AdminUserRecord>>,
    missing: AtomicBool,
    calls: AtomicUsize,
    writes: Mutex<Vec<(AdminRecordId, bool)>>,
    deleted: Mutex<Vec<AdminRecordId>>,
}

/// An admin record fixture for `user_id`.
pub fn admin_record(user_id: UserId, active: bool) -> AdminUserRecord {
    AdminUserRecord {
        id: AdminRecordId::from(Uuid::new_v4()),
        user_id,
        role: Role::Admin,
        permissions: serde_json::Value::Null,
        active,
        created_at: Utc::now(),
    }
}

impl FakeAdminUserStore {
    pub fn add(&self, record: AdminUserRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Make every subsequent call behave as if the table were absent.
    pub fn go_missing(&self) {
        self.missing.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<(AdminRecordId, bool)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<AdminRecordId> {
        self.deleted.lock().unwrap().clone()
    }

    fn tick(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.missing.load(Ordering::SeqCst) {
            return Err(RepositoryError::MissingTable("admin_users"));
        }
        Ok(())
    }
}

#[async_trait]
impl AdminUserStore for FakeAdminUserStore {
    async fn list(&self) -> Result<Vec<AdminUserRecord>, RepositoryError> {
        self.tick()?;
        Ok(self.records.lock().unwrap().clone())
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<AdminUserRecord>, RepositoryError> {
        self.tick()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id)
            .cloned())
    }

    async fn set_active(&self, id: AdminRecordId, active: bool) -> Result<(), RepositoryError> {
        self.tick()?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RepositoryError::NotFound)?;
        record.active = active;
        self.writes.lock().unwrap().push((id, active));
        Ok(())
    }

    async fn delete(&self, id: AdminRecordId) -> Result<(), RepositoryError> {
        self.tick()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}

// =============================================================================
// Promotions
// =============================================================================

#[derive(Default)]
pub struct FakePromotionStore {
    promotions: Mutex<Vec<Promotion>>,
    calls: AtomicUsize,
}

impl FakePromotionStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PromotionStore for FakePromotionStore {
    async fn list_for_venue(&self, venue_id: VenueId) -> Result<Vec<Promotion>, RepositoryError> {
        self.tick();
        Ok(self
            .promotions
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: PromotionId) -> Result<Option<Promotion>, RepositoryError> {
        self.tick();
        Ok(self
            .promotions
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert(
        &self,
        venue_id: VenueId,
        promotion: &NewPromotion,
    ) -> Result<Promotion, RepositoryError> {
        self.tick();
        let promotion = Promotion {
            id: PromotionId::from(Uuid::new_v4()),
            venue_id,
            title: promotion.title.clone(),
            description: promotion.description.clone(),
            starts_at: promotion.starts_at,
            ends_at: promotion.ends_at,
            created_at: Utc::now(),
        };
        self.promotions.lock().unwrap().push(promotion.clone());
        Ok(promotion)
    }

    async fn update(
        &self,
        id: PromotionId,
        update: &PromotionUpdate,
    ) -> Result<Promotion, RepositoryError> {
        self.tick();
        let mut promotions = self.promotions.lock().unwrap();
        let promotion = promotions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(title) = &update.title {
            promotion.title = title.clone();
        }
        if let Some(description) = &update.description {
            promotion.description = Some(description.clone());
        }
        if let Some(starts_at) = update.starts_at {
            promotion.starts_at = starts_at;
        }
        if let Some(ends_at) = update.ends_at {
            promotion.ends_at = ends_at;
        }
        Ok(promotion.clone())
    }

    async fn delete(&self, id: PromotionId) -> Result<(), RepositoryError> {
        self.tick();
        let mut promotions = self.promotions.lock().unwrap();
        let before = promotions.len();
        promotions.retain(|p| p.id != id);
        if promotions.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// =============================================================================
// Reviews
// =============================================================================

#[derive(Default)]
pub struct FakeReviewStore {
    reviews: Mutex<Vec<Review>>,
}

/// Insert a review fixture directly into the fake and return it.
pub fn stored_review(store: &FakeReviewStore) -> Review {
    let review = Review {
        id: ReviewId::from(Uuid::new_v4()),
        venue_id: VenueId::from(Uuid::new_v4()),
        user_id: UserId::from(Uuid::new_v4()),
        rating: 4,
        body: Some("Great night".to_owned()),
        created_at: Utc::now(),
    };
    store.reviews.lock().unwrap().push(review.clone());
    review
}

#[async_trait]
impl ReviewStore for FakeReviewStore {
    async fn list_recent(&self, limit: i64) -> Result<Vec<Review>, RepositoryError> {
        let mut reviews = self.reviews.lock().unwrap().clone();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(reviews)
    }

    async fn list_for_venue(
        &self,
        venue_id: VenueId,
        limit: i64,
    ) -> Result<Vec<Review>, RepositoryError> {
        let mut reviews: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.venue_id == venue_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(reviews)
    }

    async fn top_for_venue(
        &self,
        venue_id: VenueId,
        limit: i64,
    ) -> Result<Vec<Review>, RepositoryError> {
        let mut reviews: Vec<Review> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.venue_id == venue_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.rating.cmp(&a.rating));
        reviews.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(reviews)
    }

    async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let mut reviews = self.reviews.lock().unwrap();
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        if reviews.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Default)]
pub struct FakeAnalyticsStore {
    venue_samples: Mutex<Vec<(VenueId, AnalyticsSample)>>,
    system_samples: Mutex<Vec<AnalyticsSample>>,
    interactions: Mutex<Vec<InteractionEvent>>,
    calls: AtomicUsize,
}

impl FakeAnalyticsStore {
    pub fn add_venue_sample(&self, venue_id: VenueId, sample: AnalyticsSample) {
        self.venue_samples.lock().unwrap().push((venue_id, sample));
    }

    pub fn add_system_sample(&self, sample: AnalyticsSample) {
        self.system_samples.lock().unwrap().push(sample);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalyticsStore for FakeAnalyticsStore {
    async fn venue_samples(
        &self,
        venue_id: VenueId,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<Vec<AnalyticsSample>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .venue_samples
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, s)| *id == venue_id && s.date >= from && s.date <= to)
            .map(|(_, s)| s.clone())
            .collect())
    }

    async fn system_samples(
        &self,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<Vec<AnalyticsSample>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .system_samples
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.date >= from && s.date <= to)
            .cloned()
            .collect())
    }

    async fn recent_interactions(
        &self,
        limit: i64,
    ) -> Result<Vec<InteractionEvent>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut interactions = self.interactions.lock().unwrap().clone();
        interactions.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(interactions)
    }
}
