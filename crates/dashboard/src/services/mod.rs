//! Guarded domain services.
//!
//! Services sit between the HTTP layer and the repositories. Each
//! operation re-derives authorization for the specific resource it touches
//! and returns `Result<T, AppError>`; no raw repository or collaborator
//! error crosses this boundary untyped.

pub mod analytics;
pub mod cache;
pub mod identity;
pub mod moderation;
pub mod promotions;
pub mod users;
pub mod venues;

#[cfg(test)]
pub(crate) mod testing;

pub use analytics::AnalyticsService;
pub use cache::PageCache;
pub use identity::RoleResolver;
pub use moderation::ModerationService;
pub use promotions::PromotionService;
pub use users::UserAdminService;
pub use venues::VenueService;
