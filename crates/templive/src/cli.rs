//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "templive")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to templive.toml (defaults to ./templive.toml when present)
    #[arg(long, global = true, env = "TEMPLIVE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template once against a JSON data file
    Render {
        /// Template file
        #[arg(long)]
        template: PathBuf,

        /// JSON data file (defaults to an empty object)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Write the output here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run an editing session driven by JSON-line events on stdin
    Live {
        /// Preview HTML file, rewritten whenever the preview settles
        #[arg(long, default_value = "preview.html")]
        out: PathBuf,
    },

    /// Publish a template to the configured endpoint
    Publish {
        /// Markup file
        #[arg(long)]
        markup: PathBuf,

        /// Stylesheet file
        #[arg(long)]
        stylesheet: Option<PathBuf>,

        /// API key sent as the Authorization header
        #[arg(long, env = "TEMPLIVE_API_KEY", hide_env_values = true)]
        credential: Option<String>,
    },

    /// Inspect or clear the persisted documents
    #[command(subcommand)]
    Snapshot(SnapshotCommands),
}

#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// Show what is stored
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Remove every stored document
    Reset,
}
