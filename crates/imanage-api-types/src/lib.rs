//! Wire types shared by the iManage console client and its command-line tool.
//!
//! Two backends are described here:
//!
//! - the QR search backend (`/QRIDs`), whose records use camelCase keys and
//!   loosely typed identifiers;
//! - the console API (`/api/v1`), which speaks snake_case JSON for
//!   communities, members, board members, action buttons and shops.

pub mod auth;
pub mod flexible;
pub mod icom;
pub mod qrid;

pub use auth::{
    AuthResponse, CheckEmailRequest, CheckEmailResponse, LoginRequest, MessageResponse,
    RegisterRequest,
};
pub use icom::{
    ActionButton, AddActionRequest, AddActionResponse, AddBoardMemberRequest,
    AddBoardMemberResponse, AddMemberRequest, AddMemberResponse, BoardMember,
    CreateIComRequest, FilterMembersRequest, GeoSearchRequest, DistanceUnit, IComListResponse,
    IComProfile, IComStats, IComStatus, IShopProfile, LeaderboardEntry, LeaderboardResponse,
    LeaderboardType, LikeSource, LikeStatus, MemberListResponse, MemberRank, MemberStatus,
    MemberSummary, MembershipDetail, ShopStatus, ToggleLikeRequest, ToggleLikeResponse,
    UpdateActionRequest, UpdateBoardMemberRequest, UpdateIComRequest, UpdateIShopRequest,
    UpdateMemberOrderRequest, UpdateMemberStatusRequest,
};
pub use qrid::{CardDetail, CardUpdateRequest, ResultRecord};
