//! Testimonial commands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use studio_core::TestimonialSubmission;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct TestimonialsCommand {
    #[command(subcommand)]
    pub command: TestimonialsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TestimonialsSubcommand {
    /// List testimonials
    List {
        /// Include testimonials awaiting approval (admin)
        #[arg(long)]
        all: bool,

        /// Print the testimonials as JSON
        #[arg(long)]
        json: bool,
    },

    /// Approve a testimonial (admin)
    Approve {
        /// Testimonial id
        id: String,
    },

    /// Submit a testimonial as a client would
    Submit {
        #[arg(long)]
        name: String,

        #[arg(long)]
        message: String,

        /// Rating from 1 to 5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,

        #[arg(long)]
        email: Option<String>,
    },
}

pub async fn handle(cmd: TestimonialsCommand, ctx: &Context) -> Result<()> {
    match cmd.command {
        TestimonialsSubcommand::List { all, json } => {
            let listed = if all {
                ctx.require_session().await?;
                ctx.client.all_testimonials().await
            } else {
                ctx.client.testimonials().await
            };
            let testimonials = listed.context("Failed to list testimonials")?;

            if json {
                return output::json_pretty(&testimonials);
            }
            for t in &testimonials {
                let pending = if t.approved == Some(false) {
                    " (pending)"
                } else {
                    ""
                };
                let label = format!(
                    "{}: {}{}",
                    t.name.as_deref().unwrap_or("anonymous"),
                    t.message.as_deref().unwrap_or(""),
                    pending
                );
                output::item(t.id.as_deref(), &label);
            }
            Ok(())
        }
        TestimonialsSubcommand::Approve { id } => {
            ctx.require_session().await?;
            ctx.client
                .approve_testimonial(&id)
                .await
                .context("Failed to approve testimonial")?;
            output::success(&format!("Approved testimonial {}", id));
            Ok(())
        }
        TestimonialsSubcommand::Submit {
            name,
            message,
            rating,
            email,
        } => {
            let submission = TestimonialSubmission {
                name,
                message,
                rating,
                email,
            };
            ctx.client
                .submit_testimonial(&submission)
                .await
                .context("Failed to submit testimonial")?;
            output::success("Testimonial submitted for review");
            Ok(())
        }
    }
}
