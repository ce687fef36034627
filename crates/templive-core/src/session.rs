//! Editor session: the single owner of the documents and their side effects
//!
//! Edits update the in-memory documents immediately. Two debouncers then
//! decide when the preview recompiles and when the documents are persisted.
//! Timer callbacks only post a [`Settled`] event; the owner of the session
//! picks events up with [`EditorSession::recv_settled`] and applies them with
//! [`EditorSession::handle_settled`], so all state changes happen on one task.
//! Store writes run on a [`PersistWriter`] task and report back with
//! [`Settled::Saved`], so editing never waits on the store.

use crate::compile::TemplateCompiler;
use crate::config::Config;
use crate::debounce::{DebouncePolicy, Debouncer};
use crate::defaults::default_text;
use crate::document::{Credential, Document, DocumentState, Role};
use crate::persist::{PersistWriter, PersistedSnapshot, PersistenceSync};
use crate::publish::{PublishGate, PublishJob, PublishRequest};
use crate::store::KvStore;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::mpsc;

const SNAPSHOT_KEY: &str = "snapshot";

/// A debounce window that closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Edits to this document settled; the preview should refresh
    Preview(Role),
    /// Edits to any document settled; the documents should be persisted
    Persist,
    /// A store write finished for the documents as of `revision`
    Saved { revision: u64, succeeded: bool },
}

/// Debounce policies for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub preview: DebouncePolicy,
    pub persist: DebouncePolicy,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            preview: config.preview.policy(),
            persist: config.persist.policy(),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Parse the data document, `None` if it is not valid JSON
fn parse_data(text: &str) -> Option<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(error = %err, "data document is not valid JSON, keeping previous data");
            None
        }
    }
}

pub struct EditorSession<S> {
    markup: Document,
    stylesheet: Document,
    data: Document,
    data_object: Value,
    compiled: String,
    compiler: TemplateCompiler,
    credential: Credential,
    persistence: PersistenceSync<S>,
    writer: PersistWriter,
    revision: u64,
    edited_at: HashMap<Role, u64>,
    preview_debounce: Debouncer<Role>,
    persist_debounce: Debouncer<&'static str>,
    settled_tx: mpsc::UnboundedSender<Settled>,
    settled_rx: mpsc::UnboundedReceiver<Settled>,
    publish_gate: PublishGate,
}

impl<S: KvStore> EditorSession<S> {
    /// Open a session seeded from the store
    ///
    /// Documents missing from the store fall back to the built-in examples,
    /// each independently. The preview is compiled once up front. Must be
    /// called from within a tokio runtime, since it spawns the store writer.
    pub fn open(persistence: PersistenceSync<S>, options: SessionOptions) -> Self {
        let snapshot = persistence.load();
        let text = |role: Role| {
            snapshot
                .get(role)
                .unwrap_or_else(|| default_text(role))
                .to_string()
        };

        let markup = Document::new(Role::Markup, text(Role::Markup));
        let stylesheet = Document::new(Role::Stylesheet, text(Role::Stylesheet));
        let data = Document::new(Role::Data, text(Role::Data));

        let data_object = parse_data(data.text())
            .or_else(|| parse_data(default_text(Role::Data)))
            .unwrap_or_else(|| Value::Object(Default::default()));

        let mut compiler = TemplateCompiler::new();
        let compiled = compiler.render(markup.text(), &data_object);

        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let saved_tx = settled_tx.clone();
        let writer = PersistWriter::spawn(persistence.clone(), move |revision, succeeded| {
            let _ = saved_tx.send(Settled::Saved {
                revision,
                succeeded,
            });
        });

        Self {
            markup,
            stylesheet,
            data,
            data_object,
            compiled,
            compiler,
            credential: Credential::default(),
            persistence,
            writer,
            revision: 0,
            edited_at: HashMap::new(),
            preview_debounce: Debouncer::new(options.preview),
            persist_debounce: Debouncer::new(options.persist),
            settled_tx,
            settled_rx,
            publish_gate: PublishGate::default(),
        }
    }

    pub fn document(&self, role: Role) -> &Document {
        match role {
            Role::Markup => &self.markup,
            Role::Stylesheet => &self.stylesheet,
            Role::Data => &self.data,
        }
    }

    fn document_mut(&mut self, role: Role) -> &mut Document {
        match role {
            Role::Markup => &mut self.markup,
            Role::Stylesheet => &mut self.stylesheet,
            Role::Data => &mut self.data,
        }
    }

    pub fn text(&self, role: Role) -> &str {
        self.document(role).text()
    }

    /// Parsed data the preview was last compiled against
    pub fn data_object(&self) -> &Value {
        &self.data_object
    }

    /// Current preview output; never empty unless a render produced ""
    pub fn compiled(&self) -> &str {
        &self.compiled
    }

    pub fn compiler(&self) -> &TemplateCompiler {
        &self.compiler
    }

    pub fn persistence(&self) -> &PersistenceSync<S> {
        &self.persistence
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn set_credential(&mut self, credential: Credential) {
        self.credential = credential;
    }

    /// Apply an edit and schedule its side effects
    ///
    /// Must be called from within a tokio runtime.
    pub fn edit(&mut self, role: Role, text: impl Into<String>) {
        self.document_mut(role).edit(text);
        self.revision += 1;
        self.edited_at.insert(role, self.revision);

        let tx = self.settled_tx.clone();
        self.preview_debounce.schedule(role, move || {
            let _ = tx.send(Settled::Preview(role));
        });

        let tx = self.settled_tx.clone();
        self.persist_debounce.schedule(SNAPSHOT_KEY, move || {
            let _ = tx.send(Settled::Persist);
        });
    }

    /// Wait for the next debounce window to close
    ///
    /// Cancel-safe, so it can sit in a `tokio::select!` next to input.
    pub async fn recv_settled(&mut self) -> Option<Settled> {
        self.settled_rx.recv().await
    }

    /// Apply a settled event
    ///
    /// Never waits: a persist only queues the current documents on the writer.
    pub fn handle_settled(&mut self, settled: Settled) {
        match settled {
            Settled::Preview(role) => {
                self.document_mut(role).set_state(DocumentState::Quiescing);
                if role != Role::Stylesheet {
                    self.recompile();
                }
                self.document_mut(role).set_state(DocumentState::Compiled);
            }
            Settled::Persist => {
                if let Some(snapshot) = self.pending_snapshot() {
                    self.writer.submit(self.revision, snapshot);
                }
            }
            Settled::Saved {
                revision,
                succeeded,
            } => self.mark_saved(revision, succeeded),
        }
    }

    /// Wait for and handle the next settled window
    pub async fn next_settled(&mut self) -> Option<Settled> {
        let settled = self.recv_settled().await?;
        self.handle_settled(settled);
        Some(settled)
    }

    /// Reparse the data document and recompile the preview
    pub fn recompile(&mut self) {
        if let Some(value) = parse_data(self.data.text()) {
            self.data_object = value;
        }
        self.compiled = self.compiler.render(self.markup.text(), &self.data_object);
    }

    /// Current text of all three documents
    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot::complete(
            self.markup.text(),
            self.stylesheet.text(),
            self.data.text(),
        )
    }

    /// Persist immediately, dropping any pending persist timer
    ///
    /// Waits for the write, and for any write queued before it.
    pub async fn flush(&mut self) {
        self.persist_debounce.cancel(&SNAPSHOT_KEY);
        if let Some(snapshot) = self.pending_snapshot() {
            let revision = self.revision;
            let succeeded = self.writer.save_now(revision, snapshot).await;
            self.mark_saved(revision, succeeded);
        }
    }

    /// Snapshot to write, `None` when no document was edited since open
    fn pending_snapshot(&self) -> Option<PersistedSnapshot> {
        let touched = Role::ALL
            .iter()
            .any(|role| self.document(*role).state() != DocumentState::Clean);
        touched.then(|| self.snapshot())
    }

    /// Mark documents whose latest edit is covered by a finished write
    fn mark_saved(&mut self, revision: u64, succeeded: bool) {
        if !succeeded {
            return;
        }
        for role in Role::ALL {
            let covered = self
                .edited_at
                .get(&role)
                .is_some_and(|edited| *edited <= revision);
            if covered && self.document(role).state() != DocumentState::Clean {
                self.document_mut(role).set_state(DocumentState::Persisted);
            }
        }
    }

    /// Whether the publish affordance is enabled
    pub fn publish_enabled(&self) -> bool {
        self.publish_gate.is_open()
    }

    /// Capture the current documents for publishing
    ///
    /// Returns `None` while a previous publish is still in flight.
    pub fn begin_publish(&self) -> Option<PublishJob> {
        let ticket = self.publish_gate.try_acquire()?;
        let request = PublishRequest {
            markup: self.markup.text().to_string(),
            stylesheet: self.stylesheet.text().to_string(),
            credential: self.credential.clone(),
        };
        Some(PublishJob::new(request, ticket))
    }
}

impl<S> Drop for EditorSession<S> {
    fn drop(&mut self) {
        self.preview_debounce.cancel_all();
        self.persist_debounce.cancel_all();
    }
}
