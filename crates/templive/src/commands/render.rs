//! Render command - one strict render of a template file

use crate::context::Context;
use crate::output;
use anyhow::{Context as _, Result};
use colored::Colorize;
use serde_json::Value;
use std::path::Path;
use templive_core::template::TemplateEngine;

/// Render `template` against `data` and print or write the output
///
/// Unlike the live preview, a template error fails the command.
pub fn run(ctx: &Context, template: &Path, data: Option<&Path>, out: Option<&Path>) -> Result<()> {
    let markup = std::fs::read_to_string(template)
        .with_context(|| format!("Failed to read template {}", template.display()))?;

    let data: Value = match data {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read data {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?
        }
        None => Value::Object(Default::default()),
    };

    let rendered = TemplateEngine::new()
        .render(&markup, &data)
        .with_context(|| format!("Failed to render {}", template.display()))?;

    match out {
        Some(path) => {
            output::write_file(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if ctx.verbose {
                println!("{} Wrote {}", "✓".green().bold(), path.display());
            }
        }
        None => output::print_text(&rendered)?,
    }
    Ok(())
}
