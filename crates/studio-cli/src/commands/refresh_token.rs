//! Refresh token command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs, ctx: &Context) -> Result<()> {
    ctx.require_session().await?;

    eprintln!("{}", "Refreshing session...".dimmed());

    ctx.client
        .refresh()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed successfully");
    Ok(())
}
