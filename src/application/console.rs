//! Composition root: one client, one cache, every service built on them.

use std::sync::Arc;

use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::cache::{CacheConfig, QueryCache};
use crate::config::Settings;
use crate::search::SearchController;

use super::{CardService, CommunityService, ShopService};

#[derive(Debug, Clone)]
pub struct Console {
    api: ApiClient,
    cache: QueryCache<ApiError>,
    pub community: CommunityService,
    pub shops: ShopService,
    pub cards: CardService,
    pub search: SearchController,
}

impl Console {
    /// Build with a client configured from `settings` and default notice
    /// and session-expiry sinks.
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        let api = ApiClient::from_settings(&settings.api).build()?;
        Ok(Self::with_client(settings, api))
    }

    pub fn with_client(settings: &Settings, api: ApiClient) -> Self {
        let cache = QueryCache::new(&CacheConfig::from(&settings.cache));
        info!(
            api = %settings.api.base_url,
            search = %settings.api.search_base_url,
            stale_after_ms = settings.cache.stale_after_ms,
            "console ready"
        );

        Self {
            community: CommunityService::new(api.clone(), cache.clone()),
            shops: ShopService::new(api.clone(), cache.clone()),
            cards: CardService::new(api.clone(), cache.clone(), settings.links.card_base_url.clone()),
            search: SearchController::new(
                Arc::new(api.clone()),
                cache.clone(),
                settings.search.page_size,
            ),
            api,
            cache,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache<ApiError> {
        &self.cache
    }

    /// Forget the session and everything read under it.
    pub fn logout(&self) {
        self.api.logout();
        self.cache.clear();
    }
}
