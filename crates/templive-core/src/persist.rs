//! Persistence of the three documents to the key-value store
//!
//! Durability is best-effort: failures are logged and swallowed, and the
//! editing session carries on in memory. Writes go through one long-lived
//! [`PersistWriter`] task so the editor never waits on the store.

use crate::document::Role;
use crate::store::KvStore;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Persisted text of the three documents
///
/// Each field is independently optional; a missing field means the store
/// has never seen that document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersistedSnapshot {
    pub html: Option<String>,
    pub css: Option<String>,
    pub params: Option<String>,
}

impl PersistedSnapshot {
    /// Snapshot with all three fields present
    pub fn complete(
        html: impl Into<String>,
        css: impl Into<String>,
        params: impl Into<String>,
    ) -> Self {
        Self {
            html: Some(html.into()),
            css: Some(css.into()),
            params: Some(params.into()),
        }
    }

    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::Markup => self.html.as_deref(),
            Role::Stylesheet => self.css.as_deref(),
            Role::Data => self.params.as_deref(),
        }
    }

    fn set(&mut self, role: Role, value: Option<String>) {
        match role {
            Role::Markup => self.html = value,
            Role::Stylesheet => self.css = value,
            Role::Data => self.params = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Role::ALL.iter().all(|role| self.get(*role).is_none())
    }
}

/// Reads and writes [`PersistedSnapshot`]s through a [`KvStore`]
pub struct PersistenceSync<S> {
    store: Arc<S>,
}

impl<S> Clone for PersistenceSync<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KvStore> PersistenceSync<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read each key independently
    ///
    /// A key that is absent or unreadable comes back as `None`.
    pub fn load(&self) -> PersistedSnapshot {
        let mut snapshot = PersistedSnapshot::default();
        for role in Role::ALL {
            let key = role.store_key();
            let value = self.store.get(key).unwrap_or_else(|err| {
                tracing::warn!(key, error = %err, "failed to read persisted document");
                None
            });
            snapshot.set(role, value);
        }
        snapshot
    }

    /// Write the present fields of `snapshot` in one store operation
    pub fn save_blocking(&self, snapshot: &PersistedSnapshot) -> crate::Result<()> {
        let entries: Vec<(&str, &str)> = Role::ALL
            .iter()
            .filter_map(|role| snapshot.get(*role).map(|value| (role.store_key(), value)))
            .collect();
        if entries.is_empty() {
            return Ok(());
        }
        self.store.put_all(&entries)
    }

    /// Write on the blocking pool; returns whether the write succeeded
    ///
    /// Errors are logged, never returned.
    pub async fn save(&self, snapshot: PersistedSnapshot) -> bool {
        let sync = self.clone();
        let result = tokio::task::spawn_blocking(move || sync.save_blocking(&snapshot)).await;

        match result {
            Ok(Ok(())) => {
                tracing::debug!("persisted editor documents");
                true
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "failed to persist editor documents");
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "persistence task did not complete");
                false
            }
        }
    }
}

struct SaveJob {
    revision: u64,
    snapshot: PersistedSnapshot,
    done: Option<oneshot::Sender<bool>>,
}

/// Handle to the background task that performs every store write
///
/// Jobs are handled one at a time. Jobs queued behind a running write are
/// coalesced so only the newest snapshot is written. The task ends once the
/// last handle is dropped.
#[derive(Clone)]
pub struct PersistWriter {
    jobs: mpsc::UnboundedSender<SaveJob>,
}

impl PersistWriter {
    /// Spawn the writer task
    ///
    /// `on_saved` is called with the revision of each completed write and
    /// whether it succeeded. Must be called from within a tokio runtime.
    pub fn spawn<S, F>(sync: PersistenceSync<S>, on_saved: F) -> Self
    where
        S: KvStore,
        F: Fn(u64, bool) + Send + 'static,
    {
        let (jobs, mut rx) = mpsc::unbounded_channel::<SaveJob>();

        tokio::spawn(async move {
            while let Some(mut job) = rx.recv().await {
                let mut waiters: Vec<oneshot::Sender<bool>> = job.done.take().into_iter().collect();
                while let Ok(mut newer) = rx.try_recv() {
                    waiters.extend(newer.done.take());
                    job = newer;
                }

                tracing::trace!(revision = job.revision, "writing snapshot");
                let saved = sync.save(job.snapshot).await;
                for waiter in waiters {
                    let _ = waiter.send(saved);
                }
                on_saved(job.revision, saved);
            }
            tracing::trace!("persist writer stopped");
        });

        Self { jobs }
    }

    /// Queue a write without waiting for it
    pub fn submit(&self, revision: u64, snapshot: PersistedSnapshot) {
        let job = SaveJob {
            revision,
            snapshot,
            done: None,
        };
        if self.jobs.send(job).is_err() {
            tracing::warn!(revision, "persist writer is gone, dropping snapshot");
        }
    }

    /// Queue a write and wait until it, or a newer write, has finished
    pub async fn save_now(&self, revision: u64, snapshot: PersistedSnapshot) -> bool {
        let (tx, rx) = oneshot::channel();
        let job = SaveJob {
            revision,
            snapshot,
            done: Some(tx),
        };
        if self.jobs.send(job).is_err() {
            tracing::warn!(revision, "persist writer is gone, dropping snapshot");
            return false;
        }
        rx.await.unwrap_or(false)
    }
}
