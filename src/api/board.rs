//! Board member endpoints.

use imanage_api_types::{
    AddBoardMemberRequest, AddBoardMemberResponse, BoardMember, MessageResponse,
    UpdateBoardMemberRequest,
};

use crate::domain::validation;

use super::client::{ApiClient, Backend, Request};
use super::error::ApiError;

impl ApiClient {
    pub async fn list_board(&self, icom_id: &str) -> Result<Vec<BoardMember>, ApiError> {
        validation::identifier("icom", icom_id)?;
        let members: Option<Vec<BoardMember>> = self
            .call(Request::get(Backend::Console, &["icom", icom_id, "board"]))
            .await?;
        Ok(members.unwrap_or_default())
    }

    pub async fn add_board_member(
        &self,
        icom_id: &str,
        request: &AddBoardMemberRequest,
    ) -> Result<AddBoardMemberResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::board_member(request)?;
        self.call(Request::post(Backend::Console, &["icom", icom_id, "board"]).json(request)?)
            .await
    }

    pub async fn update_board_member(
        &self,
        icom_id: &str,
        member_id: &str,
        request: &UpdateBoardMemberRequest,
    ) -> Result<MessageResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::identifier("board member", member_id)?;
        let path = ["icom", icom_id, "board", member_id];
        self.call(Request::put(Backend::Console, &path).json(request)?)
            .await
    }

    pub async fn remove_board_member(
        &self,
        icom_id: &str,
        member_id: &str,
    ) -> Result<MessageResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::identifier("board member", member_id)?;
        self.call(Request::delete(
            Backend::Console,
            &["icom", icom_id, "board", member_id],
        ))
        .await
    }
}
