#![deny(clippy::all, clippy::pedantic)]

use imanage_api_types::{AddActionRequest, UpdateActionRequest};

use crate::args::ActionsCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: ActionsCmd) -> Result<(), CliError> {
    let community = &ctx.console.community;
    match cmd {
        ActionsCmd::List { icom } => print_json(&community.actions(&icom).await?),
        ActionsCmd::Add { icom, payload } => {
            let request: AddActionRequest = payload.parse()?;
            print_json(&community.add_action(&icom, &request).await?)
        }
        ActionsCmd::Update {
            icom,
            action,
            payload,
        } => {
            let request: UpdateActionRequest = payload.parse()?;
            print_json(&community.update_action(&icom, &action, &request).await?)
        }
        ActionsCmd::Remove { icom, action } => {
            print_json(&community.remove_action(&icom, &action).await?)
        }
    }
}
