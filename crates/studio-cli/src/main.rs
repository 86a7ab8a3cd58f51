//! studio - Operator CLI for the studio backend.
//!
//! A thin wrapper over `studio-http`: every command runs through the
//! authenticated client, with the session kept in a local file store.

mod cli;
mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;
use context::Context;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    let ctx = Context::new(&cli.api, cli.store.clone())?;
    let result = commands::handle(cli.command, &ctx).await;

    if let Some(route) = ctx.redirected_to() {
        output::error(&format!(
            "Session ended (login route {}). Run 'studio login' to sign in again.",
            route
        ));
    }

    result
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
