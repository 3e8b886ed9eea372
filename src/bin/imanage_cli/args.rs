//! Command-line surface for `imanage-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use imanage::config::ConsoleOverrides;
use imanage::search::SearchKind;
use imanage_api_types::{DistanceUnit, LeaderboardType, LikeSource, MemberRank, MemberStatus};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "imanage-cli", version, about = "iManage console command-line client", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: ConsoleOverrides,

    /// Path to the file holding the session token (written by `auth login`)
    #[arg(long, env = "IMANAGE_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Session token from env (no visible flag so it stays out of shell history)
    #[arg(long = "token-env", hide = true, env = "IMANAGE_TOKEN")]
    pub token_env: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in, register, log out
    Auth(AuthArgs),
    /// Search QR records
    Search(SearchArgs),
    /// QR card details, edits and links
    Cards(CardsArgs),
    /// Community management
    Icom(IcomArgs),
    /// Community membership
    Members(MembersArgs),
    /// Community board members
    Board(BoardArgs),
    /// Community action buttons
    Actions(ActionsArgs),
    /// Likes, interactions and rankings
    Leaderboard(LeaderboardArgs),
    /// Shop profiles
    Shops(ShopsArgs),
}

/// JSON payload given inline or read from a file.
#[derive(Args, Debug, Clone, Default)]
pub struct Payload {
    /// Inline JSON body
    #[arg(long)]
    pub data: Option<String>,
    /// File holding the JSON body
    #[arg(long)]
    pub data_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthCmd,
}

#[derive(Subcommand, Debug)]
pub enum AuthCmd {
    /// Log in and store the session token in the token file
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "IMANAGE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account; the email doubles as the username
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "IMANAGE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Report whether an email is already registered
    CheckEmail { email: String },
    /// Forget the stored session token
    Logout,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Text matched against card ids and owner names
    #[arg(required_unless_present = "url")]
    pub text: Option<String>,
    #[arg(long = "type", value_enum, default_value_t = SearchKindArg::All)]
    pub kind: SearchKindArg,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Console search URL query (`q=…&type=…&page=…`); overrides the other arguments
    #[arg(long, conflicts_with = "text")]
    pub url: Option<String>,
    /// Include public and private card links with each row
    #[arg(long, default_value_t = false)]
    pub links: bool,
}

#[derive(Parser, Debug)]
pub struct CardsArgs {
    #[command(subcommand)]
    pub action: CardsCmd,
}

#[derive(Subcommand, Debug)]
pub enum CardsCmd {
    /// Card record with its links
    Get { id: String },
    /// QR codes for a card's public and private links
    Qr {
        id: String,
        /// Write `<id>-public.svg` and `<id>-private.svg` into this directory
        /// instead of drawing the codes in the terminal
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Update owner fields of a card
    Update {
        id: String,
        #[arg(long)]
        owner_name: Option<String>,
        #[arg(long)]
        owner_address: Option<String>,
        #[arg(long)]
        owner_phone: Option<String>,
        /// JSON metadata object, inline or from a file
        #[command(flatten)]
        metadata: Payload,
    },
}

#[derive(Parser, Debug)]
pub struct IcomArgs {
    #[command(subcommand)]
    pub action: IcomCmd,
}

#[derive(Subcommand, Debug)]
pub enum IcomCmd {
    /// List communities
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Community profile
    Get { id: String },
    /// Community statistics
    Stats { id: String },
    /// Create a community from a JSON body
    Create {
        #[command(flatten)]
        payload: Payload,
    },
    /// Update a community from a JSON body
    Update {
        id: String,
        #[command(flatten)]
        payload: Payload,
    },
    /// Delete a community
    Delete { id: String },
}

#[derive(Parser, Debug)]
pub struct MembersArgs {
    #[command(subcommand)]
    pub action: MembersCmd,
}

#[derive(Subcommand, Debug)]
pub enum MembersCmd {
    /// List, filter or search members
    List {
        icom: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Full-text search; takes precedence over filters
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long)]
        province: Option<String>,
        #[arg(long, value_enum)]
        status: Option<MemberStatusArg>,
        #[arg(long, value_enum)]
        rank: Option<MemberRankArg>,
    },
    /// Membership detail of one shop
    Get { icom: String, shop: String },
    /// Add a shop from a JSON body
    Add {
        icom: String,
        #[command(flatten)]
        payload: Payload,
    },
    /// Remove a shop from the community
    Remove { icom: String, shop: String },
    /// Change status, rank or role
    Status {
        icom: String,
        shop: String,
        #[arg(long, value_enum)]
        status: Option<MemberStatusArg>,
        #[arg(long, value_enum)]
        rank: Option<MemberRankArg>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Change display order (1-based)
    Order {
        icom: String,
        shop: String,
        #[arg(long)]
        order: u32,
    },
    /// Members near a point
    Geo {
        icom: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        radius: f64,
        #[arg(long, value_enum, default_value_t = DistanceUnitArg::Km)]
        unit: DistanceUnitArg,
    },
}

#[derive(Parser, Debug)]
pub struct BoardArgs {
    #[command(subcommand)]
    pub action: BoardCmd,
}

#[derive(Subcommand, Debug)]
pub enum BoardCmd {
    List {
        icom: String,
    },
    Add {
        icom: String,
        #[command(flatten)]
        payload: Payload,
    },
    Update {
        icom: String,
        member: String,
        #[command(flatten)]
        payload: Payload,
    },
    Remove {
        icom: String,
        member: String,
    },
}

#[derive(Parser, Debug)]
pub struct ActionsArgs {
    #[command(subcommand)]
    pub action: ActionsCmd,
}

#[derive(Subcommand, Debug)]
pub enum ActionsCmd {
    /// Buttons in display order
    List {
        icom: String,
    },
    Add {
        icom: String,
        #[command(flatten)]
        payload: Payload,
    },
    Update {
        icom: String,
        action: String,
        #[command(flatten)]
        payload: Payload,
    },
    Remove {
        icom: String,
        action: String,
    },
}

#[derive(Parser, Debug)]
pub struct LeaderboardArgs {
    #[command(subcommand)]
    pub action: LeaderboardCmd,
}

#[derive(Subcommand, Debug)]
pub enum LeaderboardCmd {
    /// Ranked shops
    Show {
        icom: String,
        #[arg(long = "type", value_enum, default_value_t = LeaderboardKindArg::Likes)]
        kind: LeaderboardKindArg,
        #[arg(long)]
        limit: Option<u32>,
        /// Narrows the likes board only
        #[arg(long, value_enum)]
        source: Option<LikeSourceArg>,
    },
    /// Like or unlike a shop on behalf of a visitor
    Like {
        icom: String,
        shop: String,
        #[arg(long)]
        visitor: Uuid,
        #[arg(long, value_enum, default_value_t = LikeSourceArg::Icom)]
        source: LikeSourceArg,
    },
    /// Record one interaction with a shop
    Interact { icom: String, shop: String },
}

#[derive(Parser, Debug)]
pub struct ShopsArgs {
    #[command(subcommand)]
    pub action: ShopsCmd,
}

#[derive(Subcommand, Debug)]
pub enum ShopsCmd {
    Get {
        id: String,
    },
    /// Update a shop from a JSON body
    Update {
        id: String,
        #[command(flatten)]
        payload: Payload,
    },
    Delete {
        id: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SearchKindArg {
    All,
    Ishop,
    Icard,
}

impl From<SearchKindArg> for SearchKind {
    fn from(arg: SearchKindArg) -> Self {
        match arg {
            SearchKindArg::All => SearchKind::All,
            SearchKindArg::Ishop => SearchKind::ShopOnly,
            SearchKindArg::Icard => SearchKind::CardOnly,
        }
    }
}

impl fmt::Display for SearchKindArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(SearchKind::from(*self).as_str())
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MemberStatusArg {
    Active,
    Inactive,
    Suspended,
    Pending,
}

impl From<MemberStatusArg> for MemberStatus {
    fn from(arg: MemberStatusArg) -> Self {
        match arg {
            MemberStatusArg::Active => MemberStatus::Active,
            MemberStatusArg::Inactive => MemberStatus::Inactive,
            MemberStatusArg::Suspended => MemberStatus::Suspended,
            MemberStatusArg::Pending => MemberStatus::Pending,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MemberRankArg {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

impl From<MemberRankArg> for MemberRank {
    fn from(arg: MemberRankArg) -> Self {
        match arg {
            MemberRankArg::Platinum => MemberRank::Platinum,
            MemberRankArg::Gold => MemberRank::Gold,
            MemberRankArg::Silver => MemberRank::Silver,
            MemberRankArg::Bronze => MemberRank::Bronze,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DistanceUnitArg {
    Km,
    Mi,
}

impl From<DistanceUnitArg> for DistanceUnit {
    fn from(arg: DistanceUnitArg) -> Self {
        match arg {
            DistanceUnitArg::Km => DistanceUnit::Km,
            DistanceUnitArg::Mi => DistanceUnit::Mi,
        }
    }
}

impl fmt::Display for DistanceUnitArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Km => "km",
            Self::Mi => "mi",
        })
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LeaderboardKindArg {
    Likes,
    Interactions,
}

impl From<LeaderboardKindArg> for LeaderboardType {
    fn from(arg: LeaderboardKindArg) -> Self {
        match arg {
            LeaderboardKindArg::Likes => LeaderboardType::Likes,
            LeaderboardKindArg::Interactions => LeaderboardType::Interactions,
        }
    }
}

impl fmt::Display for LeaderboardKindArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(LeaderboardType::from(*self).as_str())
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LikeSourceArg {
    Icom,
    Ishop,
}

impl From<LikeSourceArg> for LikeSource {
    fn from(arg: LikeSourceArg) -> Self {
        match arg {
            LikeSourceArg::Icom => LikeSource::Icom,
            LikeSourceArg::Ishop => LikeSource::Ishop,
        }
    }
}

impl fmt::Display for LikeSourceArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(LikeSource::from(*self).as_str())
    }
}
