//! Membership, geo search and ranking endpoints of one community.

use imanage_api_types::{
    AddMemberRequest, AddMemberResponse, FilterMembersRequest, GeoSearchRequest,
    LeaderboardResponse, LeaderboardType, LikeSource, MemberListResponse, MemberSummary,
    MembershipDetail, MessageResponse, ToggleLikeRequest, ToggleLikeResponse,
    UpdateMemberOrderRequest, UpdateMemberStatusRequest,
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::validation;

use super::client::{ApiClient, Backend, Request};
use super::error::ApiError;

pub(crate) const DEFAULT_LEADERBOARD_LIMIT: u32 = 10;

/// Parameters of a member listing.
///
/// A non-blank `search` uses the full-text endpoint; otherwise a non-empty
/// `filter` uses the filter endpoint; otherwise the plain paginated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "FilterMembersRequest::is_empty")]
    pub filter: FilterMembersRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for MemberQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            filter: FilterMembersRequest::default(),
            search: None,
        }
    }
}

impl MemberQuery {
    fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

impl ApiClient {
    pub async fn list_members(
        &self,
        icom_id: &str,
        query: &MemberQuery,
    ) -> Result<MemberListResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        let page = query.page.max(1);
        let limit = query.limit.max(1);

        let request = if let Some(text) = query.search_text() {
            Request::get(Backend::Console, &["icom", icom_id, "search"])
                .query("q", text)
                .query("page", page)
                .query("limit", limit)
        } else if !query.filter.is_empty() {
            let body = FilterMembersRequest {
                page: Some(page),
                limit: Some(limit),
                ..query.filter.clone()
            };
            Request::post(Backend::Console, &["icom", icom_id, "members", "filter"]).json(&body)?
        } else {
            Request::get(Backend::Console, &["icom", icom_id, "members"])
                .query("page", page)
                .query("limit", limit)
        };

        self.call(request).await
    }

    pub async fn add_member(
        &self,
        icom_id: &str,
        request: &AddMemberRequest,
    ) -> Result<AddMemberResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::new_member(request)?;
        self.call(Request::post(Backend::Console, &["icom", icom_id, "members"]).json(request)?)
            .await
    }

    /// Membership joined with the shop profile; `None` when the shop is not a member.
    pub async fn member_detail(
        &self,
        icom_id: &str,
        shop_id: &str,
    ) -> Result<Option<MembershipDetail>, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::identifier("shop", shop_id)?;
        let raw: Option<Value> = self
            .call_optional(Request::get(
                Backend::Console,
                &["icom", icom_id, "members", shop_id],
            ))
            .await?;

        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_value(normalize_member_detail(raw))?)),
        }
    }

    pub async fn remove_member(
        &self,
        icom_id: &str,
        shop_id: &str,
    ) -> Result<MessageResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::identifier("shop", shop_id)?;
        self.call(Request::delete(
            Backend::Console,
            &["icom", icom_id, "members", shop_id],
        ))
        .await
    }

    pub async fn update_member_status(
        &self,
        icom_id: &str,
        shop_id: &str,
        request: &UpdateMemberStatusRequest,
    ) -> Result<MessageResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::identifier("shop", shop_id)?;
        let path = ["icom", icom_id, "members", shop_id, "status"];
        self.call(Request::put(Backend::Console, &path).json(request)?)
            .await
    }

    pub async fn update_member_order(
        &self,
        icom_id: &str,
        shop_id: &str,
        request: &UpdateMemberOrderRequest,
    ) -> Result<MessageResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::identifier("shop", shop_id)?;
        validation::member_order(request)?;
        let path = ["icom", icom_id, "members", shop_id, "order"];
        self.call(Request::put(Backend::Console, &path).json(request)?)
            .await
    }

    /// Members within `radius` of a point, nearest first as returned by the server.
    pub async fn geo_search(
        &self,
        icom_id: &str,
        request: &GeoSearchRequest,
    ) -> Result<Vec<MemberSummary>, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::geo_search(request)?;
        let members: Option<Vec<MemberSummary>> = self
            .call(Request::post(Backend::Console, &["icom", icom_id, "geo-search"]).json(request)?)
            .await?;
        Ok(members.unwrap_or_default())
    }

    /// Top shops by score; `source` only narrows the `likes` board.
    pub async fn leaderboard(
        &self,
        icom_id: &str,
        kind: LeaderboardType,
        limit: Option<u32>,
        source: Option<LikeSource>,
    ) -> Result<LeaderboardResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        let mut request = Request::get(Backend::Console, &["icom", icom_id, "leaderboard"])
            .query("type", kind.as_str())
            .query("limit", limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT).max(1));
        if kind == LeaderboardType::Likes
            && let Some(source) = source
        {
            request = request.query("source", source.as_str());
        }
        self.call(request).await
    }

    pub async fn toggle_like(
        &self,
        icom_id: &str,
        shop_id: &str,
        request: &ToggleLikeRequest,
    ) -> Result<ToggleLikeResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::identifier("shop", shop_id)?;
        let path = ["icom", icom_id, "likes", shop_id];
        self.call(Request::post(Backend::Console, &path).json(request)?)
            .await
    }

    pub async fn record_interaction(
        &self,
        icom_id: &str,
        shop_id: &str,
    ) -> Result<MessageResponse, ApiError> {
        validation::identifier("icom", icom_id)?;
        validation::identifier("shop", shop_id)?;
        self.call(Request::post(
            Backend::Console,
            &["icom", icom_id, "interactions", shop_id],
        ))
        .await
    }
}

/// Unwrap an optional `{ "data": … }` envelope and fill `shop_id` from `id`.
fn normalize_member_detail(raw: Value) -> Value {
    let mut detail = match raw {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    if let Value::Object(map) = &mut detail {
        let missing = map
            .get("shop_id")
            .is_none_or(|value| value.is_null() || value.as_str() == Some(""));
        if missing && let Some(id) = map.get("id").cloned() {
            let id = match id {
                Value::String(text) => Value::String(text),
                other => Value::String(other.to_string()),
            };
            map.insert("shop_id".to_string(), id);
        }
    }
    detail
}
