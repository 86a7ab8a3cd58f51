//! Subcommand implementations.

pub mod gallery;
pub mod login;
pub mod logout;
pub mod photos;
pub mod refresh_token;
pub mod request;
pub mod testimonials;
pub mod whoami;

use anyhow::Result;

use crate::cli::Commands;
use crate::context::Context;

pub async fn handle(cmd: Commands, ctx: &Context) -> Result<()> {
    match cmd {
        Commands::Login(args) => login::run(args, ctx).await,
        Commands::Logout(args) => logout::run(args, ctx).await,
        Commands::Whoami(args) => whoami::run(args, ctx).await,
        Commands::RefreshToken(args) => refresh_token::run(args, ctx).await,
        Commands::Gallery(args) => gallery::run(args, ctx).await,
        Commands::Photos(cmd) => photos::handle(cmd, ctx).await,
        Commands::Testimonials(cmd) => testimonials::handle(cmd, ctx).await,
        Commands::Request(args) => request::run(args, ctx).await,
    }
}
