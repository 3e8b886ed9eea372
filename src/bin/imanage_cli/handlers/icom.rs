#![deny(clippy::all, clippy::pedantic)]

use imanage_api_types::{CreateIComRequest, UpdateIComRequest};

use crate::args::IcomCmd;
use crate::client::{CliError, Ctx};
use crate::print::{print_found, print_json};

pub async fn handle(ctx: &Ctx, cmd: IcomCmd) -> Result<(), CliError> {
    let community = &ctx.console.community;
    match cmd {
        IcomCmd::List { page, limit } => print_json(&community.list(page, limit).await?),
        IcomCmd::Get { id } => print_found("community", community.profile(&id).await?),
        IcomCmd::Stats { id } => print_json(&community.stats(&id).await?),
        IcomCmd::Create { payload } => {
            let request: CreateIComRequest = payload.parse()?;
            print_json(&community.create(&request).await?)
        }
        IcomCmd::Update { id, payload } => {
            let request: UpdateIComRequest = payload.parse()?;
            print_json(&community.update(&id, &request).await?)
        }
        IcomCmd::Delete { id } => print_json(&community.delete(&id).await?),
    }
}
