//! Domain models for the dashboard.
//!
//! These are read models over tables owned by the hosted backend. The
//! dashboard never migrates this schema; it reads and writes whatever the
//! deployment exposes.

pub mod analytics;
pub mod promotion;
pub mod review;
pub mod session;
pub mod user;
pub mod venue;

pub use analytics::{AnalyticsSample, EngagementSummary, GrowthMetrics, InteractionEvent};
pub use promotion::{NewPromotion, Promotion, PromotionUpdate};
pub use review::Review;
pub use session::{CurrentPrincipal, session_keys};
pub use user::{AdminUserRecord, UserAccount};
pub use venue::{NewVenue, OwnershipRecord, Venue, VenueImage, VenueUpdate};
