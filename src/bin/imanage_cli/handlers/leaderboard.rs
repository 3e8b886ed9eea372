#![deny(clippy::all, clippy::pedantic)]

use imanage_api_types::ToggleLikeRequest;

use crate::args::LeaderboardCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: LeaderboardCmd) -> Result<(), CliError> {
    let community = &ctx.console.community;
    match cmd {
        LeaderboardCmd::Show {
            icom,
            kind,
            limit,
            source,
        } => {
            let board = community
                .leaderboard(&icom, kind.into(), limit, source.map(Into::into))
                .await?;
            print_json(&board)
        }
        LeaderboardCmd::Like {
            icom,
            shop,
            visitor,
            source,
        } => {
            let request = ToggleLikeRequest {
                visitor_id: visitor,
                source: source.into(),
            };
            print_json(&community.toggle_like(&icom, &shop, &request).await?)
        }
        LeaderboardCmd::Interact { icom, shop } => {
            print_json(&community.record_interaction(&icom, &shop).await?)
        }
    }
}
