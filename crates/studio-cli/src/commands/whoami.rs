//! Whoami command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs, ctx: &Context) -> Result<()> {
    let user = ctx
        .client
        .current_user()
        .await
        .context("Failed to load session")?
        .context("No active session. Run 'studio login' first.")?;

    output::field("User", user.display_name());
    if let Some(email) = &user.email {
        output::field("Email", email);
    }
    if let Some(role) = &user.role {
        output::field("Role", role);
    }
    output::field("API", ctx.client.config().api().as_str());
    if let Some(updated) = ctx.store.updated_at().context("Failed to read session")? {
        output::field("Session saved", &updated.to_rfc3339());
    }

    Ok(())
}
