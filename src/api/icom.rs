//! Community (`/icom`) endpoints.

use imanage_api_types::{
    CreateIComRequest, IComListResponse, IComProfile, IComStats, MessageResponse,
    UpdateIComRequest,
};

use crate::domain::validation;

use super::client::{ApiClient, Backend, Request};
use super::error::ApiError;

impl ApiClient {
    pub async fn list_icoms(&self, page: u32, limit: u32) -> Result<IComListResponse, ApiError> {
        let request = Request::get(Backend::Console, &["icom"])
            .query("page", page.max(1))
            .query("limit", limit.max(1));
        self.call(request).await
    }

    pub async fn get_icom(&self, id: &str) -> Result<Option<IComProfile>, ApiError> {
        validation::identifier("icom", id)?;
        self.call_optional(Request::get(Backend::Console, &["icom", id]))
            .await
    }

    pub async fn create_icom(&self, request: &CreateIComRequest) -> Result<IComProfile, ApiError> {
        validation::new_icom(request)?;
        self.call(Request::post(Backend::Console, &["icom"]).json(request)?)
            .await
    }

    pub async fn update_icom(
        &self,
        id: &str,
        request: &UpdateIComRequest,
    ) -> Result<MessageResponse, ApiError> {
        validation::identifier("icom", id)?;
        self.call(Request::put(Backend::Console, &["icom", id]).json(request)?)
            .await
    }

    pub async fn delete_icom(&self, id: &str) -> Result<MessageResponse, ApiError> {
        validation::identifier("icom", id)?;
        self.call(Request::delete(Backend::Console, &["icom", id]))
            .await
    }

    pub async fn icom_stats(&self, id: &str) -> Result<IComStats, ApiError> {
        validation::identifier("icom", id)?;
        self.call(Request::get(Backend::Console, &["icom", id, "stats"]))
            .await
    }
}
