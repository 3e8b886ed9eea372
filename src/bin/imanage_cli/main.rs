//! imanage-cli: command-line client for the iManage console.
//! Every command goes through the library's cached services.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;
#[cfg(test)]
mod tests;

use clap::Parser;
use imanage::infra::telemetry;

use args::{Cli, Commands};
use client::{CliError, build_ctx_from_cli};
use handlers::{actions, auth, board, cards, icom, leaderboard, members, search, shops};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = build_ctx_from_cli(&cli)?;
    telemetry::init(&ctx.settings.logging)?;

    match cli.command {
        Commands::Auth(cmd) => auth::handle(&ctx, cmd.action).await?,
        Commands::Search(args) => search::handle(&ctx, args).await?,
        Commands::Cards(cmd) => cards::handle(&ctx, cmd.action).await?,
        Commands::Icom(cmd) => icom::handle(&ctx, cmd.action).await?,
        Commands::Members(cmd) => members::handle(&ctx, cmd.action).await?,
        Commands::Board(cmd) => board::handle(&ctx, cmd.action).await?,
        Commands::Actions(cmd) => actions::handle(&ctx, cmd.action).await?,
        Commands::Leaderboard(cmd) => leaderboard::handle(&ctx, cmd.action).await?,
        Commands::Shops(cmd) => shops::handle(&ctx, cmd.action).await?,
    }

    Ok(())
}
