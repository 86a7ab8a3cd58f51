//! Admin photo commands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct PhotosCommand {
    #[command(subcommand)]
    pub command: PhotosSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PhotosSubcommand {
    /// List every photo
    List {
        /// Print the photos as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a photo
    Delete {
        /// Photo id
        id: String,
    },
}

pub async fn handle(cmd: PhotosCommand, ctx: &Context) -> Result<()> {
    ctx.require_session().await?;

    match cmd.command {
        PhotosSubcommand::List { json } => {
            let photos = ctx
                .client
                .admin_photos()
                .await
                .context("Failed to list photos")?;
            if json {
                return output::json_pretty(&photos);
            }
            for photo in &photos {
                let label = match (&photo.title, &photo.category) {
                    (Some(title), Some(category)) => format!("{} [{}]", title, category),
                    (Some(title), None) => title.clone(),
                    (None, _) => photo.url.clone().unwrap_or_default(),
                };
                output::item(photo.id.as_deref(), &label);
            }
            Ok(())
        }
        PhotosSubcommand::Delete { id } => {
            ctx.client
                .delete_photo(&id)
                .await
                .context("Failed to delete photo")?;
            output::success(&format!("Deleted photo {}", id));
            Ok(())
        }
    }
}
