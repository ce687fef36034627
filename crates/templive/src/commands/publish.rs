//! Publish command - send a markup file and stylesheet to the endpoint

use crate::context::Context;
use crate::output;
use anyhow::{bail, Context as _, Result};
use colored::Colorize;
use std::path::Path;
use templive_core::document::Credential;
use templive_core::publish::{PublishRequest, PublishResult, Publisher};
use templive_publish::PublishClient;

pub fn run(
    ctx: &Context,
    markup: &Path,
    stylesheet: Option<&Path>,
    credential: Option<String>,
) -> Result<()> {
    let request = PublishRequest {
        markup: std::fs::read_to_string(markup)
            .with_context(|| format!("Failed to read markup {}", markup.display()))?,
        stylesheet: match stylesheet {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read stylesheet {}", path.display()))?,
            None => String::new(),
        },
        credential: Credential::new(credential.unwrap_or_default()),
    };

    let client = PublishClient::from_config(&ctx.config.publish)?;
    if ctx.verbose {
        println!("{} Publishing to {}", "→".cyan(), client.endpoint());
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    let result = rt.block_on(client.publish(&request));

    match result {
        PublishResult::Success { .. } => {
            output::print_text(&format!("{} {}", "✓".green().bold(), result.message()))?;
            Ok(())
        }
        _ => bail!(result.message()),
    }
}
