//! Community (iCom) management: profile, members, board, action buttons and
//! rankings. Reads are cached; every successful mutation invalidates the
//! families that could now be out of date.

use imanage_api_types::{
    ActionButton, AddActionRequest, AddActionResponse, AddBoardMemberRequest,
    AddBoardMemberResponse, AddMemberRequest, AddMemberResponse, BoardMember,
    CreateIComRequest, GeoSearchRequest, IComListResponse, IComProfile, IComStats,
    LeaderboardResponse, LeaderboardType, LikeSource, MemberListResponse, MemberSummary,
    MembershipDetail, MessageResponse, ToggleLikeRequest, ToggleLikeResponse,
    UpdateActionRequest, UpdateBoardMemberRequest, UpdateIComRequest, UpdateMemberOrderRequest,
    UpdateMemberStatusRequest,
};

use crate::api::{ApiClient, ApiError, MemberQuery};
use crate::cache::QueryCache;

use super::cached::{invalidate, read};
use super::keys;

#[derive(Debug, Clone)]
pub struct CommunityService {
    api: ApiClient,
    cache: QueryCache<ApiError>,
}

impl CommunityService {
    pub fn new(api: ApiClient, cache: QueryCache<ApiError>) -> Self {
        Self { api, cache }
    }

    // ------------------------------------------------------------------
    // Communities
    // ------------------------------------------------------------------

    pub async fn list(&self, page: u32, limit: u32) -> Result<IComListResponse, ApiError> {
        let api = self.api.clone();
        read(&self.cache, keys::icom_page(page, limit), async move {
            api.list_icoms(page, limit).await
        })
        .await
    }

    pub async fn profile(&self, id: &str) -> Result<Option<IComProfile>, ApiError> {
        let (api, id) = (self.api.clone(), id.to_owned());
        read(&self.cache, keys::icom(&id), async move { api.get_icom(&id).await }).await
    }

    pub async fn stats(&self, id: &str) -> Result<IComStats, ApiError> {
        let (api, id) = (self.api.clone(), id.to_owned());
        read(&self.cache, keys::icom_stats(&id), async move {
            api.icom_stats(&id).await
        })
        .await
    }

    pub async fn create(&self, request: &CreateIComRequest) -> Result<IComProfile, ApiError> {
        let created = self.api.create_icom(request).await?;
        invalidate(&self.cache, "create_icom", &[keys::icoms()]);
        Ok(created)
    }

    pub async fn update(
        &self,
        id: &str,
        request: &UpdateIComRequest,
    ) -> Result<MessageResponse, ApiError> {
        let response = self.api.update_icom(id, request).await?;
        invalidate(&self.cache, "update_icom", &[keys::icom(id), keys::icoms()]);
        Ok(response)
    }

    pub async fn delete(&self, id: &str) -> Result<MessageResponse, ApiError> {
        let response = self.api.delete_icom(id).await?;
        invalidate(
            &self.cache,
            "delete_icom",
            &[keys::icom(id), keys::icoms(), keys::icom_stats(id)],
        );
        Ok(response)
    }

    // ------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------

    pub async fn members(
        &self,
        icom_id: &str,
        query: &MemberQuery,
    ) -> Result<MemberListResponse, ApiError> {
        let key = keys::member_page(icom_id, query);
        let (api, icom_id, query) = (self.api.clone(), icom_id.to_owned(), query.clone());
        read(&self.cache, key, async move {
            api.list_members(&icom_id, &query).await
        })
        .await
    }

    pub async fn member(
        &self,
        icom_id: &str,
        shop_id: &str,
    ) -> Result<Option<MembershipDetail>, ApiError> {
        let key = keys::member_detail(icom_id, shop_id);
        let (api, icom_id, shop_id) = (self.api.clone(), icom_id.to_owned(), shop_id.to_owned());
        read(&self.cache, key, async move {
            api.member_detail(&icom_id, &shop_id).await
        })
        .await
    }

    pub async fn add_member(
        &self,
        icom_id: &str,
        request: &AddMemberRequest,
    ) -> Result<AddMemberResponse, ApiError> {
        let response = self.api.add_member(icom_id, request).await?;
        invalidate(
            &self.cache,
            "add_member",
            &[keys::members(icom_id), keys::icom_stats(icom_id)],
        );
        Ok(response)
    }

    pub async fn update_member_status(
        &self,
        icom_id: &str,
        shop_id: &str,
        request: &UpdateMemberStatusRequest,
    ) -> Result<MessageResponse, ApiError> {
        let response = self
            .api
            .update_member_status(icom_id, shop_id, request)
            .await?;
        invalidate(
            &self.cache,
            "update_member_status",
            &[keys::member_detail(icom_id, shop_id), keys::members(icom_id)],
        );
        Ok(response)
    }

    pub async fn update_member_order(
        &self,
        icom_id: &str,
        shop_id: &str,
        request: &UpdateMemberOrderRequest,
    ) -> Result<MessageResponse, ApiError> {
        let response = self
            .api
            .update_member_order(icom_id, shop_id, request)
            .await?;
        invalidate(&self.cache, "update_member_order", &[keys::members(icom_id)]);
        Ok(response)
    }

    pub async fn remove_member(
        &self,
        icom_id: &str,
        shop_id: &str,
    ) -> Result<MessageResponse, ApiError> {
        let response = self.api.remove_member(icom_id, shop_id).await?;
        invalidate(
            &self.cache,
            "remove_member",
            &[
                keys::members(icom_id),
                keys::member_detail(icom_id, shop_id),
                keys::icom_stats(icom_id),
            ],
        );
        Ok(response)
    }

    /// Not cached: every call is a fresh proximity query.
    pub async fn geo_search(
        &self,
        icom_id: &str,
        request: &GeoSearchRequest,
    ) -> Result<Vec<MemberSummary>, ApiError> {
        self.api.geo_search(icom_id, request).await
    }

    // ------------------------------------------------------------------
    // Board
    // ------------------------------------------------------------------

    pub async fn board(&self, icom_id: &str) -> Result<Vec<BoardMember>, ApiError> {
        let (api, icom_id) = (self.api.clone(), icom_id.to_owned());
        read(&self.cache, keys::board(&icom_id), async move {
            api.list_board(&icom_id).await
        })
        .await
    }

    pub async fn add_board_member(
        &self,
        icom_id: &str,
        request: &AddBoardMemberRequest,
    ) -> Result<AddBoardMemberResponse, ApiError> {
        let response = self.api.add_board_member(icom_id, request).await?;
        invalidate(&self.cache, "add_board_member", &[keys::board(icom_id)]);
        Ok(response)
    }

    pub async fn update_board_member(
        &self,
        icom_id: &str,
        member_id: &str,
        request: &UpdateBoardMemberRequest,
    ) -> Result<MessageResponse, ApiError> {
        let response = self
            .api
            .update_board_member(icom_id, member_id, request)
            .await?;
        invalidate(&self.cache, "update_board_member", &[keys::board(icom_id)]);
        Ok(response)
    }

    pub async fn remove_board_member(
        &self,
        icom_id: &str,
        member_id: &str,
    ) -> Result<MessageResponse, ApiError> {
        let response = self.api.remove_board_member(icom_id, member_id).await?;
        invalidate(&self.cache, "remove_board_member", &[keys::board(icom_id)]);
        Ok(response)
    }

    // ------------------------------------------------------------------
    // Action buttons
    // ------------------------------------------------------------------

    /// Buttons in display order.
    pub async fn actions(&self, icom_id: &str) -> Result<Vec<ActionButton>, ApiError> {
        let (api, icom_id) = (self.api.clone(), icom_id.to_owned());
        read(&self.cache, keys::actions(&icom_id), async move {
            api.list_actions(&icom_id).await
        })
        .await
    }

    pub async fn add_action(
        &self,
        icom_id: &str,
        request: &AddActionRequest,
    ) -> Result<AddActionResponse, ApiError> {
        let response = self.api.add_action(icom_id, request).await?;
        invalidate(&self.cache, "add_action", &[keys::actions(icom_id)]);
        Ok(response)
    }

    pub async fn update_action(
        &self,
        icom_id: &str,
        action_id: &str,
        request: &UpdateActionRequest,
    ) -> Result<MessageResponse, ApiError> {
        let response = self.api.update_action(icom_id, action_id, request).await?;
        invalidate(&self.cache, "update_action", &[keys::actions(icom_id)]);
        Ok(response)
    }

    pub async fn remove_action(
        &self,
        icom_id: &str,
        action_id: &str,
    ) -> Result<MessageResponse, ApiError> {
        let response = self.api.remove_action(icom_id, action_id).await?;
        invalidate(&self.cache, "remove_action", &[keys::actions(icom_id)]);
        Ok(response)
    }

    // ------------------------------------------------------------------
    // Ranking
    // ------------------------------------------------------------------

    pub async fn leaderboard(
        &self,
        icom_id: &str,
        kind: LeaderboardType,
        limit: Option<u32>,
        source: Option<LikeSource>,
    ) -> Result<LeaderboardResponse, ApiError> {
        let key = keys::leaderboard(icom_id, kind, limit, source);
        let (api, icom_id) = (self.api.clone(), icom_id.to_owned());
        read(&self.cache, key, async move {
            api.leaderboard(&icom_id, kind, limit, source).await
        })
        .await
    }

    pub async fn toggle_like(
        &self,
        icom_id: &str,
        shop_id: &str,
        request: &ToggleLikeRequest,
    ) -> Result<ToggleLikeResponse, ApiError> {
        let response = self.api.toggle_like(icom_id, shop_id, request).await?;
        invalidate(&self.cache, "toggle_like", &[keys::leaderboards(icom_id)]);
        Ok(response)
    }

    pub async fn record_interaction(
        &self,
        icom_id: &str,
        shop_id: &str,
    ) -> Result<MessageResponse, ApiError> {
        let response = self.api.record_interaction(icom_id, shop_id).await?;
        invalidate(&self.cache, "record_interaction", &[keys::leaderboards(icom_id)]);
        Ok(response)
    }
}
