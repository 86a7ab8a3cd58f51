//! Logout command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs, ctx: &Context) -> Result<()> {
    ctx.client
        .logout()
        .await
        .context("Failed to remove session")?;

    output::success("Logged out");
    Ok(())
}
