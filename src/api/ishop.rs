//! Shop (`/ishop`) endpoints.

use imanage_api_types::{IShopProfile, MessageResponse, UpdateIShopRequest};

use crate::domain::validation;

use super::client::{ApiClient, Backend, Request};
use super::error::ApiError;

impl ApiClient {
    pub async fn get_ishop(&self, id: &str) -> Result<Option<IShopProfile>, ApiError> {
        validation::identifier("ishop", id)?;
        self.call_optional(Request::get(Backend::Console, &["ishop", id]))
            .await
    }

    pub async fn update_ishop(
        &self,
        id: &str,
        request: &UpdateIShopRequest,
    ) -> Result<MessageResponse, ApiError> {
        validation::identifier("ishop", id)?;
        self.call(Request::put(Backend::Console, &["ishop", id]).json(request)?)
            .await
    }

    pub async fn delete_ishop(&self, id: &str) -> Result<MessageResponse, ApiError> {
        validation::identifier("ishop", id)?;
        self.call(Request::delete(Backend::Console, &["ishop", id]))
            .await
    }
}
