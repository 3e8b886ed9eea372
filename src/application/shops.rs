//! Shop storefront (iShop) profiles.

use imanage_api_types::{IShopProfile, MessageResponse, UpdateIShopRequest};

use crate::api::{ApiClient, ApiError};
use crate::cache::QueryCache;

use super::cached::{invalidate, read};
use super::keys;

#[derive(Debug, Clone)]
pub struct ShopService {
    api: ApiClient,
    cache: QueryCache<ApiError>,
}

impl ShopService {
    pub fn new(api: ApiClient, cache: QueryCache<ApiError>) -> Self {
        Self { api, cache }
    }

    pub async fn profile(&self, id: &str) -> Result<Option<IShopProfile>, ApiError> {
        let (api, id) = (self.api.clone(), id.to_owned());
        read(&self.cache, keys::ishop(&id), async move { api.get_ishop(&id).await }).await
    }

    /// Membership details embed shop fields, so every detail is refreshed.
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateIShopRequest,
    ) -> Result<MessageResponse, ApiError> {
        let response = self.api.update_ishop(id, request).await?;
        invalidate(&self.cache, "update_ishop", &[keys::ishop(id), keys::member_details()]);
        Ok(response)
    }

    pub async fn delete(&self, id: &str) -> Result<MessageResponse, ApiError> {
        let response = self.api.delete_ishop(id).await?;
        invalidate(&self.cache, "delete_ishop", &[keys::ishop(id), keys::member_details()]);
        Ok(response)
    }
}
