//! QR record endpoints on the search backend.

use imanage_api_types::{CardDetail, CardUpdateRequest, ResultRecord};

use crate::domain::validation;
use crate::search::QueryFilter;

use super::client::{ApiClient, Backend, Request};
use super::error::ApiError;

impl ApiClient {
    /// `GET /QRIDs?filter=<json>`.
    pub async fn search_records(&self, filter: &QueryFilter) -> Result<Vec<ResultRecord>, ApiError> {
        let request =
            Request::get(Backend::Search, &["QRIDs"]).query("filter", filter.to_query_param()?);
        self.call(request).await
    }

    pub async fn card_detail(&self, id: &str) -> Result<Option<CardDetail>, ApiError> {
        validation::identifier("card", id)?;
        self.call_optional(Request::get(Backend::Search, &["QRIDs", id.trim()]))
            .await
    }

    pub async fn update_card(
        &self,
        id: &str,
        update: &CardUpdateRequest,
    ) -> Result<CardDetail, ApiError> {
        validation::identifier("card", id)?;
        if update.is_empty() {
            return Err(ApiError::validation("nothing to update"));
        }
        let request = Request::new(Backend::Search, reqwest::Method::PATCH, &["QRIDs", id.trim()])
            .json(update)?;
        self.call(request).await
    }
}
