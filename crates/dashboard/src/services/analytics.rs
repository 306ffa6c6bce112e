//! Engagement analytics: pure aggregation plus the guarded read surfaces.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;

use buzzvar_core::VenueId;

use crate::db::{AnalyticsStore, EventStore, OwnershipStore, UserStore, VenueStore};
use crate::error::AppError;
use crate::models::{
    AnalyticsSample, CurrentPrincipal, EngagementSummary, GrowthMetrics, InteractionEvent,
};
use crate::services::identity::RoleResolver;

/// Window length for the system overview growth figures.
const GROWTH_WINDOW_DAYS: i64 = 30;

/// Interactions shown in the overview activity feed.
const ACTIVITY_FEED_LIMIT: i64 = 10;

/// Percentage change from `previous` to `current`, zero-guarded.
///
/// A zero baseline yields 100 when anything appeared and 0 when nothing
/// did, so the result is never infinite or NaN.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Entity counts stay far below f64 precision
pub fn percent_change(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        if current > 0 { 100.0 } else { 0.0 }
    } else {
        (current - previous) as f64 / previous as f64 * 100.0
    }
}

/// Sum a sample window into one [`EngagementSummary`].
///
/// The rating mean only averages samples that carry a rating; days without
/// reviews do not drag the mean toward zero. An empty window yields
/// all-zero sums and no rating.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Sample counts stay far below f64 precision
pub fn summarize(samples: &[AnalyticsSample]) -> EngagementSummary {
    let mut summary = EngagementSummary::default();
    let mut rating_sum = 0.0;
    let mut rated_days = 0u32;

    for sample in samples {
        summary.views += sample.views;
        summary.likes += sample.likes;
        summary.saves += sample.saves;
        summary.shares += sample.shares;
        summary.check_ins += sample.check_ins;
        summary.review_count += sample.review_count;
        if let Some(rating) = sample.average_rating {
            rating_sum += rating;
            rated_days += 1;
        }
    }

    if rated_days > 0 {
        summary.average_rating = Some(rating_sum / f64::from(rated_days));
    }
    summary
}

/// Per-metric change between two summary windows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementDelta {
    pub views_pct: f64,
    pub likes_pct: f64,
    pub saves_pct: f64,
    pub shares_pct: f64,
    pub check_ins_pct: f64,
}

impl EngagementDelta {
    fn between(current: &EngagementSummary, previous: &EngagementSummary) -> Self {
        Self {
            views_pct: percent_change(current.views, previous.views),
            likes_pct: percent_change(current.likes, previous.likes),
            saves_pct: percent_change(current.saves, previous.saves),
            shares_pct: percent_change(current.shares, previous.shares),
            check_ins_pct: percent_change(current.check_ins, previous.check_ins),
        }
    }
}

/// Engagement over two adjacent windows: the current one, the prior one of
/// the same length, and the change between them.
#[derive(Debug, Clone, Serialize)]
pub struct EngagementWindows {
    pub current: EngagementSummary,
    pub previous: EngagementSummary,
    pub change: EngagementDelta,
}

/// Day bounds for a window of `days` ending today, plus the adjacent prior
/// window of the same length.
fn window_bounds(days: i64) -> (NaiveDate, NaiveDate, NaiveDate, NaiveDate) {
    let today = Utc::now().date_naive();
    let current_from = today - Duration::days(days - 1);
    let previous_to = current_from - Duration::days(1);
    let previous_from = previous_to - Duration::days(days - 1);
    (current_from, today, previous_from, previous_to)
}

fn zero_window_error() -> AppError {
    AppError::Validation {
        field: "days".to_owned(),
        message: "window must cover at least one day".to_owned(),
    }
}

/// Super-admin system overview payload.
#[derive(Debug, Clone, Serialize)]
pub struct SystemOverview {
    pub users: GrowthMetrics,
    pub venues: GrowthMetrics,
    pub events: GrowthMetrics,
    pub recent_activity: Vec<InteractionEvent>,
}

/// Guarded analytics reads.
#[derive(Clone)]
pub struct AnalyticsService {
    roles: RoleResolver,
    samples: Arc<dyn AnalyticsStore>,
    ownership: Arc<dyn OwnershipStore>,
    users: Arc<dyn UserStore>,
    venues: Arc<dyn VenueStore>,
    events: Arc<dyn EventStore>,
}

impl AnalyticsService {
    #[must_use]
    pub fn new(
        roles: RoleResolver,
        samples: Arc<dyn AnalyticsStore>,
        ownership: Arc<dyn OwnershipStore>,
        users: Arc<dyn UserStore>,
        venues: Arc<dyn VenueStore>,
        events: Arc<dyn EventStore>,
    ) -> Self {
        Self {
            roles,
            samples,
            ownership,
            users,
            venues,
            events,
        }
    }

    /// Engagement for one venue over the last `days` days, compared to the
    /// window of the same length before it. Owner-scoped: callers without
    /// an ownership record for this venue get the ambiguous denial.
    ///
    /// # Errors
    ///
    /// `AccessDenied` without ownership, `Validation` for a zero window,
    /// storage failures otherwise.
    pub async fn venue_engagement(
        &self,
        principal: &CurrentPrincipal,
        venue_id: VenueId,
        days: u32,
    ) -> Result<EngagementWindows, AppError> {
        if days == 0 {
            return Err(zero_window_error());
        }
        if self.ownership.find(principal.id, venue_id).await?.is_none() {
            return Err(AppError::venue_access_denied());
        }

        let (current_from, current_to, previous_from, previous_to) =
            window_bounds(i64::from(days));
        let (current, previous) = tokio::join!(
            self.samples.venue_samples(venue_id, current_from, current_to),
            self.samples.venue_samples(venue_id, previous_from, previous_to),
        );
        let current = summarize(&current?);
        let previous = summarize(&previous?);
        let change = EngagementDelta::between(&current, &previous);

        Ok(EngagementWindows {
            current,
            previous,
            change,
        })
    }

    /// Platform-wide engagement over the last `days` days, compared to the
    /// window of the same length before it. Super admins only.
    ///
    /// # Errors
    ///
    /// `AccessDenied` for non-super-admins, `Validation` for a zero
    /// window, storage failures otherwise.
    pub async fn system_engagement(
        &self,
        principal: &CurrentPrincipal,
        days: u32,
    ) -> Result<EngagementWindows, AppError> {
        if days == 0 {
            return Err(zero_window_error());
        }
        self.roles.require_super_admin(principal).await?;

        let (current_from, current_to, previous_from, previous_to) =
            window_bounds(i64::from(days));
        let (current, previous) = tokio::join!(
            self.samples.system_samples(current_from, current_to),
            self.samples.system_samples(previous_from, previous_to),
        );
        let current = summarize(&current?);
        let previous = summarize(&previous?);
        let change = EngagementDelta::between(&current, &previous);

        Ok(EngagementWindows {
            current,
            previous,
            change,
        })
    }

    /// System-wide overview: per-entity totals with 30-day-over-30-day
    /// growth, plus the recent activity feed. Super admins only.
    ///
    /// # Errors
    ///
    /// `AccessDenied` for non-super-admins, storage failures otherwise.
    pub async fn system_overview(
        &self,
        principal: &CurrentPrincipal,
    ) -> Result<SystemOverview, AppError> {
        self.roles.require_super_admin(principal).await?;

        let now = Utc::now();
        let window_ago = now - Duration::days(GROWTH_WINDOW_DAYS);
        let two_windows_ago = now - Duration::days(2 * GROWTH_WINDOW_DAYS);

        let (users, venues, events, activity) = tokio::join!(
            self.user_growth(window_ago, two_windows_ago),
            self.venue_growth(window_ago, two_windows_ago),
            self.event_growth(window_ago, two_windows_ago),
            self.samples.recent_interactions(ACTIVITY_FEED_LIMIT),
        );

        Ok(SystemOverview {
            users: users?,
            venues: venues?,
            events: events?,
            recent_activity: activity?,
        })
    }

    async fn user_growth(
        &self,
        window_ago: chrono::DateTime<Utc>,
        two_windows_ago: chrono::DateTime<Utc>,
    ) -> Result<GrowthMetrics, AppError> {
        let (total, previous, before_previous) = tokio::join!(
            self.users.count(),
            self.users.count_created_before(window_ago),
            self.users.count_created_before(two_windows_ago),
        );
        Ok(growth_metrics(total?, previous?, before_previous?))
    }

    async fn venue_growth(
        &self,
        window_ago: chrono::DateTime<Utc>,
        two_windows_ago: chrono::DateTime<Utc>,
    ) -> Result<GrowthMetrics, AppError> {
        let (total, previous, before_previous) = tokio::join!(
            self.venues.count(),
            self.venues.count_created_before(window_ago),
            self.venues.count_created_before(two_windows_ago),
        );
        Ok(growth_metrics(total?, previous?, before_previous?))
    }

    async fn event_growth(
        &self,
        window_ago: chrono::DateTime<Utc>,
        two_windows_ago: chrono::DateTime<Utc>,
    ) -> Result<GrowthMetrics, AppError> {
        let (total, previous, before_previous) = tokio::join!(
            self.events.count(),
            self.events.count_created_before(window_ago),
            self.events.count_created_before(two_windows_ago),
        );
        Ok(growth_metrics(total?, previous?, before_previous?))
    }
}

/// Growth figures for one entity: the overall total, the total as of one
/// window ago, and the change of this window's additions over the prior
/// window's.
fn growth_metrics(total: i64, previous_total: i64, before_previous: i64) -> GrowthMetrics {
    let added_current = total - previous_total;
    let added_previous = previous_total - before_previous;
    GrowthMetrics {
        total,
        previous_total,
        change_pct: percent_change(added_current, added_previous),
    }
}
