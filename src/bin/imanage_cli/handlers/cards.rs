#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::Path;

use imanage::domain::qr::QrImage;
use imanage_api_types::{CardDetail, CardUpdateRequest};
use serde_json::json;

use crate::args::CardsCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: CardsCmd) -> Result<(), CliError> {
    match cmd {
        CardsCmd::Get { id } => get(ctx, &id).await,
        CardsCmd::Qr { id, out } => qr(ctx, &id, out.as_deref()).await,
        CardsCmd::Update {
            id,
            owner_name,
            owner_address,
            owner_phone,
            metadata,
        } => {
            let update = CardUpdateRequest {
                owner_name,
                owner_address,
                owner_phone_number: owner_phone,
                metadata: metadata.parse_opt()?,
            };
            let card = ctx.console.cards.update(&id, &update).await?;
            print_json(&card)
        }
    }
}

async fn get(ctx: &Ctx, id: &str) -> Result<(), CliError> {
    let card = fetch(ctx, id).await?;
    let links = ctx.console.cards.links(&card).ok();
    print_json(&json!({ "card": card, "links": links }))
}

async fn qr(ctx: &Ctx, id: &str, out: Option<&Path>) -> Result<(), CliError> {
    let card = fetch(ctx, id).await?;
    let codes = ctx.console.cards.qr_codes(&card)?;

    let Some(dir) = out else {
        for (label, image) in [("public", &codes.public), ("private", &codes.private)] {
            println!("{label}: {}", image.url);
            println!("{}", image.terminal());
        }
        return Ok(());
    };

    let public = write_svg(dir, &card.id, "public", &codes.public)?;
    let private = write_svg(dir, &card.id, "private", &codes.private)?;
    print_json(&json!({
        "public": { "url": codes.public.url, "path": public },
        "private": { "url": codes.private.url, "path": private },
    }))
}

async fn fetch(ctx: &Ctx, id: &str) -> Result<CardDetail, CliError> {
    ctx.console
        .cards
        .detail(id)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("card {}", id.trim())))
}

fn write_svg(dir: &Path, id: &str, label: &str, image: &QrImage) -> Result<String, CliError> {
    let path = dir.join(format!("{id}-{label}.svg"));
    fs::write(&path, &image.svg).map_err(|source| CliError::OutputFile {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path.display().to_string())
}
