//! Cache keys of every cached read, and the families mutations invalidate.
//!
//! Ids are trimmed so that `" 42"` and `"42"` share an entry.

use imanage_api_types::{LeaderboardType, LikeSource};

use crate::api::{DEFAULT_LEADERBOARD_LIMIT, MemberQuery};
use crate::cache::QueryKey;
use crate::search::controller::RECORDS_RESOURCE;

pub const ICOMS: &str = "icoms";
pub const ICOM: &str = "icom";
pub const ICOM_STATS: &str = "icom-stats";
pub const MEMBERS: &str = "members";
pub const MEMBER_DETAIL: &str = "member-detail";
pub const ICOM_BOARD: &str = "icom-board";
pub const ICOM_ACTIONS: &str = "icom-actions";
pub const ICOM_LEADERBOARD: &str = "icom-leaderboard";
pub const ISHOP: &str = "ishop";
pub const QRID: &str = "qrid";

pub fn icoms() -> QueryKey {
    QueryKey::new(ICOMS)
}

pub fn icom_page(page: u32, limit: u32) -> QueryKey {
    icoms().with(page).with(limit)
}

pub fn icom(id: &str) -> QueryKey {
    QueryKey::new(ICOM).with(id.trim())
}

pub fn icom_stats(id: &str) -> QueryKey {
    QueryKey::new(ICOM_STATS).with(id.trim())
}

/// Every member listing of one community.
pub fn members(icom_id: &str) -> QueryKey {
    QueryKey::new(MEMBERS).with(icom_id.trim())
}

pub fn member_page(icom_id: &str, query: &MemberQuery) -> QueryKey {
    members(icom_id).with_params(query)
}

/// Every member detail, across communities.
pub fn member_details() -> QueryKey {
    QueryKey::new(MEMBER_DETAIL)
}

pub fn member_detail(icom_id: &str, shop_id: &str) -> QueryKey {
    member_details().with(icom_id.trim()).with(shop_id.trim())
}

pub fn board(icom_id: &str) -> QueryKey {
    QueryKey::new(ICOM_BOARD).with(icom_id.trim())
}

pub fn actions(icom_id: &str) -> QueryKey {
    QueryKey::new(ICOM_ACTIONS).with(icom_id.trim())
}

pub fn leaderboards(icom_id: &str) -> QueryKey {
    QueryKey::new(ICOM_LEADERBOARD).with(icom_id.trim())
}

pub fn leaderboard(
    icom_id: &str,
    kind: LeaderboardType,
    limit: Option<u32>,
    source: Option<LikeSource>,
) -> QueryKey {
    let source = match (kind, source) {
        (LeaderboardType::Likes, Some(source)) => source.as_str(),
        _ => "-",
    };
    leaderboards(icom_id)
        .with(kind.as_str())
        .with(limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT).max(1))
        .with(source)
}

pub fn ishop(id: &str) -> QueryKey {
    QueryKey::new(ISHOP).with(id.trim())
}

pub fn qrid(id: &str) -> QueryKey {
    QueryKey::new(QRID).with(id.trim())
}

/// Search counts and pages.
pub fn qrids() -> QueryKey {
    QueryKey::new(RECORDS_RESOURCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_pages_fall_under_the_community_family() {
        let query = MemberQuery {
            search: Some("tea".into()),
            ..MemberQuery::default()
        };
        let key = member_page(" 42 ", &query);
        assert!(key.starts_with(&members("42")));
        assert!(!key.starts_with(&members("4")));
        assert_eq!(key.to_string(), r#"members/42/{"page":1,"limit":20,"search":"tea"}"#);
    }

    #[test]
    fn leaderboard_source_only_keys_likes() {
        let interactions = leaderboard(
            "7",
            LeaderboardType::Interactions,
            None,
            Some(LikeSource::Icom),
        );
        assert_eq!(interactions.to_string(), "icom-leaderboard/7/interactions/10/-");
        assert!(interactions.starts_with(&leaderboards("7")));
    }

    #[test]
    fn card_and_search_families_are_distinct() {
        assert!(!qrid("5").starts_with(&qrids()));
        assert!(member_detail("1", "2").starts_with(&member_details()));
    }
}
