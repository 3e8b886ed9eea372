#![deny(clippy::all, clippy::pedantic)]

use imanage_api_types::UpdateIShopRequest;

use crate::args::ShopsCmd;
use crate::client::{CliError, Ctx};
use crate::print::{print_found, print_json};

pub async fn handle(ctx: &Ctx, cmd: ShopsCmd) -> Result<(), CliError> {
    let shops = &ctx.console.shops;
    match cmd {
        ShopsCmd::Get { id } => print_found("shop", shops.profile(&id).await?),
        ShopsCmd::Update { id, payload } => {
            let request: UpdateIShopRequest = payload.parse()?;
            print_json(&shops.update(&id, &request).await?)
        }
        ShopsCmd::Delete { id } => print_json(&shops.delete(&id).await?),
    }
}
