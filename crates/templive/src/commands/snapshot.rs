//! Snapshot commands - inspect or clear the persisted documents

use crate::context::Context;
use crate::output;
use anyhow::{Context as _, Result};
use colored::Colorize;
use templive_core::document::Role;
use templive_core::persist::PersistenceSync;
use templive_core::store::KvStore;

/// Show the stored documents
pub fn show(ctx: &Context, json: bool) -> Result<()> {
    let store = ctx.store()?;
    let path = store.path().to_path_buf();
    let snapshot = PersistenceSync::new(store).load();

    if json {
        let value = serde_json::json!({
            "path": path.display().to_string(),
            "documents": snapshot,
        });
        output::print_json(&serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    println!("{} Store: {}", "→".cyan(), path.display());
    for role in Role::ALL {
        match snapshot.get(role) {
            Some(text) => println!(
                "  {} {} ({} bytes)",
                "✓".green(),
                role.store_key(),
                text.len()
            ),
            None => println!("  {} {} (not set)", "-".dimmed(), role.store_key()),
        }
    }
    Ok(())
}

/// Remove the store file
pub fn reset(ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    store
        .clear()
        .with_context(|| format!("Failed to clear {}", store.path().display()))?;
    println!(
        "{} Cleared snapshot store at {}",
        "✓".green().bold(),
        store.path().display()
    );
    Ok(())
}
