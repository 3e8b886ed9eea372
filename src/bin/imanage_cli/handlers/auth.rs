#![deny(clippy::all, clippy::pedantic)]

use serde_json::json;

use crate::args::AuthCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: AuthCmd) -> Result<(), CliError> {
    match cmd {
        AuthCmd::Login { username, password } => login(ctx, &username, &password).await,
        AuthCmd::Register {
            email,
            password,
            confirm,
        } => register(ctx, &email, &password, &confirm).await,
        AuthCmd::CheckEmail { email } => check_email(ctx, &email).await,
        AuthCmd::Logout => logout(ctx),
    }
}

async fn login(ctx: &Ctx, username: &str, password: &str) -> Result<(), CliError> {
    if ctx.token_file.is_none() {
        return Err(CliError::MissingTokenFile);
    }
    let res = ctx.console.api().login(username, password).await?;
    ctx.save_token()?;
    print_json(&json!({ "logged_in": true, "user": res.user }))
}

async fn register(ctx: &Ctx, email: &str, password: &str, confirm: &str) -> Result<(), CliError> {
    let res = ctx.console.api().register(email, password, confirm).await?;
    let logged_in = res.token.is_some();
    if logged_in && ctx.token_file.is_some() {
        ctx.save_token()?;
    }
    print_json(&json!({ "registered": true, "logged_in": logged_in }))
}

async fn check_email(ctx: &Ctx, email: &str) -> Result<(), CliError> {
    let exists = ctx.console.api().check_email(email).await?;
    print_json(&json!({ "email": email.trim(), "exists": exists }))
}

fn logout(ctx: &Ctx) -> Result<(), CliError> {
    ctx.console.logout();
    if ctx.token_file.is_some() {
        ctx.save_token()?;
    }
    println!("logged out");
    Ok(())
}
