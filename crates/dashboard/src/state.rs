//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::baas::{AuthClient, FileStorageClient};
use crate::config::DashboardConfig;
use crate::db::{
    PgAdminUserStore, PgAnalyticsStore, PgEventStore, PgOwnershipStore, PgPromotionStore,
    PgReviewStore, PgUserStore, PgVenueStore,
};
use crate::services::{
    AnalyticsService, ModerationService, PageCache, PromotionService, RoleResolver,
    UserAdminService, VenueService,
};

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub config: DashboardConfig,
    pub pool: PgPool,
    pub auth: AuthClient,
    pub files: FileStorageClient,
    pub roles: RoleResolver,
    pub venues: VenueService,
    pub users: UserAdminService,
    pub promotions: PromotionService,
    pub moderation: ModerationService,
    pub analytics: AnalyticsService,
    pub page_cache: PageCache,
}

impl AppState {
    /// Wire the Postgres-backed stores into the guarded services.
    #[must_use]
    pub fn new(config: DashboardConfig, pool: PgPool) -> Self {
        let auth = AuthClient::new(&config.baas);
        let files = FileStorageClient::new(&config.baas);

        let ownership = Arc::new(PgOwnershipStore::new(pool.clone()));
        let venues = Arc::new(PgVenueStore::new(pool.clone()));
        let users = Arc::new(PgUserStore::new(pool.clone()));
        let admin_users = Arc::new(PgAdminUserStore::new(pool.clone()));
        let events = Arc::new(PgEventStore::new(pool.clone()));
        let promotions = Arc::new(PgPromotionStore::new(pool.clone()));
        let reviews = Arc::new(PgReviewStore::new(pool.clone()));
        let samples = Arc::new(PgAnalyticsStore::new(pool.clone()));

        let roles = RoleResolver::new(
            config.super_admin_emails.clone(),
            config.admin_emails.clone(),
            ownership.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                auth,
                files,
                venues: VenueService::new(
                    roles.clone(),
                    venues.clone(),
                    ownership.clone(),
                    events.clone(),
                    reviews.clone(),
                ),
                users: UserAdminService::new(roles.clone(), users.clone(), admin_users),
                promotions: PromotionService::new(promotions, ownership.clone()),
                moderation: ModerationService::new(roles.clone(), reviews),
                analytics: AnalyticsService::new(
                    roles.clone(),
                    samples,
                    ownership,
                    users,
                    venues,
                    events,
                ),
                roles,
                page_cache: PageCache::new(),
                config,
                pool,
            }),
        }
    }
}

impl std::ops::Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
