//! Action button endpoints.

use imanage_api_types::{
    ActionButton, AddActionRequest, AddActionResponse, MessageResponse, UpdateActionRequest,
};

use crate::domain::validation;

use super::client::{ApiClient, Backend, Request};
use super::error::ApiError;

impl ApiClient {
    /// Action buttons ordered by `order`; unordered buttons sort last.
    pub async fn list_actions(&self, icom_id: &str) -> Result<Vec<ActionButton>, ApiError> {
        validation::identifier("icom", icom_id)?;
        let actions: Option<Vec<ActionButton>> = self
            .call(Request::get(Backend::Console, &["icom", icom_id, "actions"]))
            .await?;
        let mut actions = actions.unwrap_or_default();
        actions.sort_by_key(|action| action.order.unwrap_or(i32::MAX));
        Ok(actions)
    }

    pub async fn add_action(
        &self,
        icom_id: &str,
        request: &AddActionRequest,
    ) -> Result<AddActionResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::action(request)?;
        self.call(Request::post(Backend::Console, &["icom", icom_id, "actions"]).json(request)?)
            .await
    }

    pub async fn update_action(
        &self,
        icom_id: &str,
        action_id: &str,
        request: &UpdateActionRequest,
    ) -> Result<MessageResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::identifier("action", action_id)?;
        let path = ["icom", icom_id, "actions", action_id];
        self.call(Request::put(Backend::Console, &path).json(request)?)
            .await
    }

    pub async fn remove_action(
        &self,
        icom_id: &str,
        action_id: &str,
    ) -> Result<MessageResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::identifier("action", action_id)?;
        self.call(Request::delete(
            Backend::Console,
            &["icom", icom_id, "actions", action_id],
        ))
        .await
    }
}
