//! Login command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use studio_core::Credentials;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Admin account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "STUDIO_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, ctx: &Context) -> Result<()> {
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let user = ctx
        .client
        .login(credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("User", user.display_name());
    if let Some(role) = &user.role {
        output::field("Role", role);
    }
    output::field("API", ctx.client.config().api().as_str());

    Ok(())
}
