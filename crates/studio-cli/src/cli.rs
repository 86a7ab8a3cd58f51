//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    gallery::GalleryArgs, login::LoginArgs, logout::LogoutArgs, photos::PhotosCommand,
    refresh_token::RefreshTokenArgs, request::RequestArgs, testimonials::TestimonialsCommand,
    whoami::WhoamiArgs,
};

/// Operator CLI for the photography studio backend.
#[derive(Parser, Debug)]
#[command(name = "studio")]
#[command(author, version = env!("STUDIO_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Backend base URL
    #[arg(
        long,
        global = true,
        env = "STUDIO_API_URL",
        default_value = "http://localhost:5000"
    )]
    pub api: String,

    /// Session file (defaults to the platform data directory)
    #[arg(long, global = true, env = "STUDIO_SESSION_FILE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session
    Login(LoginArgs),

    /// Remove the stored session
    Logout(LogoutArgs),

    /// Display the signed-in user
    Whoami(WhoamiArgs),

    /// Renew the session tokens
    RefreshToken(RefreshTokenArgs),

    /// List the public gallery
    Gallery(GalleryArgs),

    /// Manage photos (admin)
    Photos(PhotosCommand),

    /// List, approve and submit testimonials
    Testimonials(TestimonialsCommand),

    /// Send a raw authenticated request
    Request(RequestArgs),
}
