mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands, SnapshotCommands};
use context::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "templive=debug,templive_core=debug,templive_publish=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = Context::new(cli.config.as_deref(), cli.verbose).and_then(|ctx| match cli.command {
        Commands::Render {
            template,
            data,
            out,
        } => commands::render::run(&ctx, &template, data.as_deref(), out.as_deref()),
        Commands::Live { out } => commands::live::run(&ctx, &out),
        Commands::Publish {
            markup,
            stylesheet,
            credential,
        } => commands::publish::run(&ctx, &markup, stylesheet.as_deref(), credential),
        Commands::Snapshot(snapshot_cmd) => match snapshot_cmd {
            SnapshotCommands::Show { json } => commands::snapshot::show(&ctx, json),
            SnapshotCommands::Reset => commands::snapshot::reset(&ctx),
        },
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
