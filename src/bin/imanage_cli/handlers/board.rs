#![deny(clippy::all, clippy::pedantic)]

use imanage_api_types::{AddBoardMemberRequest, UpdateBoardMemberRequest};

use crate::args::BoardCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: BoardCmd) -> Result<(), CliError> {
    let community = &ctx.console.community;
    match cmd {
        BoardCmd::List { icom } => print_json(&community.board(&icom).await?),
        BoardCmd::Add { icom, payload } => {
            let request: AddBoardMemberRequest = payload.parse()?;
            print_json(&community.add_board_member(&icom, &request).await?)
        }
        BoardCmd::Update {
            icom,
            member,
            payload,
        } => {
            let request: UpdateBoardMemberRequest = payload.parse()?;
            print_json(&community.update_board_member(&icom, &member, &request).await?)
        }
        BoardCmd::Remove { icom, member } => {
            print_json(&community.remove_board_member(&icom, &member).await?)
        }
    }
}
