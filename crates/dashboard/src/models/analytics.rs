//! Analytics domain types.
//!
//! Samples are written by the external analytics pipeline, one row per
//! entity per day, and are immutable from this system's perspective.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Per-day engagement counters for one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSample {
    /// The day the counters cover.
    pub date: NaiveDate,
    pub views: i64,
    pub likes: i64,
    pub saves: i64,
    pub shares: i64,
    pub check_ins: i64,
    pub review_count: i64,
    /// Mean rating received that day, absent when no reviews landed.
    pub average_rating: Option<f64>,
}

/// Sums over a sample window, plus the rating mean.
///
/// `average_rating` is the arithmetic mean over samples whose rating is
/// present; days without a rating do not contribute a zero to the
/// denominator. An empty window yields all-zero sums and `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct EngagementSummary {
    pub views: i64,
    pub likes: i64,
    pub saves: i64,
    pub shares: i64,
    pub check_ins: i64,
    pub review_count: i64,
    pub average_rating: Option<f64>,
}

/// Period-over-period growth for one tracked entity count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthMetrics {
    /// Count at the end of the current window.
    pub total: i64,
    /// Count at the end of the prior window.
    pub previous_total: i64,
    /// Percentage change, zero-guarded (never infinity or NaN).
    pub change_pct: f64,
}

/// A recent user interaction, for activity feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub kind: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}
