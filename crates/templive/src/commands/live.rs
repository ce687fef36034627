//! Live command - an editing session driven by JSON-line events on stdin
//!
//! Each input line is one event:
//!
//! ```text
//! {"edit": "markup", "text": "<h1>{{title}}</h1>"}
//! {"credential": "sk-..."}
//! {"publish": true}
//! ```
//!
//! The preview page is rewritten whenever a preview debounce settles. End of
//! input (or Ctrl-C) compiles the latest documents, persists them and waits
//! for any publish still in flight.

use crate::context::Context;
use crate::output;
use anyhow::{Context as _, Result};
use colored::Colorize;
use serde::Deserialize;
use std::path::Path;
use templive_core::config::consts::publish::API_KEY_ENV;
use templive_core::document::{Credential, Role};
use templive_core::persist::PersistenceSync;
use templive_core::publish::PublishResult;
use templive_core::session::{EditorSession, SessionOptions, Settled};
use templive_core::store::KvStore;
use templive_publish::PublishClient;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
enum LiveEvent {
    Edit { edit: Role, text: String },
    Credential { credential: String },
    Publish { publish: bool },
}

pub fn run(ctx: &Context, out: &Path) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    rt.block_on(run_session(ctx, out))
}

async fn run_session(ctx: &Context, out: &Path) -> Result<()> {
    let persistence = PersistenceSync::new(ctx.store()?);
    let mut session = EditorSession::open(persistence, SessionOptions::from_config(&ctx.config));
    let client = PublishClient::from_config(&ctx.config.publish)?;

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        session.set_credential(Credential::new(key));
    }

    write_preview(&session, out)?;
    if ctx.verbose {
        println!("{} Preview: {}", "→".cyan(), out.display());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut publishes: JoinSet<PublishResult> = JoinSet::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => handle_line(&mut session, &client, &mut publishes, &line),
                    None => break,
                }
            }
            Some(settled) = session.recv_settled() => {
                session.handle_settled(settled);
                if let Settled::Preview(_) = settled {
                    write_preview(&session, out)?;
                }
            }
            Some(joined) = publishes.join_next() => report_publish(joined)?,
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // Apply whatever is still waiting on a timer
    session.recompile();
    write_preview(&session, out)?;
    session.flush().await;

    while let Some(joined) = publishes.join_next().await {
        report_publish(joined)?;
    }
    Ok(())
}

fn handle_line<S: KvStore>(
    session: &mut EditorSession<S>,
    client: &PublishClient,
    publishes: &mut JoinSet<PublishResult>,
    line: &str,
) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let event = match serde_json::from_str::<LiveEvent>(line) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unrecognised event");
            return;
        }
    };

    match event {
        LiveEvent::Edit { edit, text } => session.edit(edit, text),
        LiveEvent::Credential { credential } => session.set_credential(Credential::new(credential)),
        LiveEvent::Publish { publish: false } => {}
        LiveEvent::Publish { publish: true } => match session.begin_publish() {
            Some(job) => {
                let client = client.clone();
                publishes.spawn(async move { job.run(&client).await });
            }
            None => eprintln!("{} A publish is already in progress", "!".yellow()),
        },
    }
}

fn report_publish(joined: Result<PublishResult, tokio::task::JoinError>) -> Result<()> {
    let result = joined.context("Publish task failed")?;
    match result {
        PublishResult::Success { .. } => {
            output::print_text(&format!("{} {}", "✓".green().bold(), result.message()))?
        }
        _ => eprintln!("{} {}", "✗".red().bold(), result.message()),
    }
    Ok(())
}

fn write_preview<S: KvStore>(session: &EditorSession<S>, out: &Path) -> Result<()> {
    let page = output::preview_document(session.compiled(), session.text(Role::Stylesheet));
    output::write_file(out, &page).with_context(|| format!("Failed to write {}", out.display()))
}
