//! Gallery command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct GalleryArgs {
    /// Print the photos as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: GalleryArgs, ctx: &Context) -> Result<()> {
    let photos = ctx
        .client
        .gallery()
        .await
        .context("Failed to list gallery")?;

    if args.json {
        return output::json_pretty(&photos);
    }
    for photo in &photos {
        output::item(
            photo.id.as_deref(),
            photo.title.as_deref().or(photo.url.as_deref()).unwrap_or(""),
        );
    }
    Ok(())
}
