//! Durable string key-value store backing session persistence

use crate::error::{Result, TempliveError};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// String-valued key-value store
///
/// Implementations only need to be safe to call from a blocking worker
/// thread; there is a single writer.
pub trait KvStore: Send + Sync + 'static {
    /// Read one key; `Ok(None)` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several keys in one operation
    fn put_all(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove every key
    fn clear(&self) -> Result<()>;
}

/// Store kept as a JSON object in a single file
///
/// Every write replaces the file atomically, so a crash mid-write leaves the
/// previous contents in place.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(TempliveError::StoreReadError {
                    path: self.path.clone(),
                    reason: format!("Failed to read: {}", e),
                });
            }
        };

        serde_json::from_str(&content).map_err(|e| TempliveError::StoreReadError {
            path: self.path.clone(),
            reason: format!("Failed to parse: {}", e),
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(map).map_err(|e| self.write_error("serialize", e))?;
        let parent = ensure_parent_dir(&self.path)?;
        atomic_write(&content, &self.path, parent)
    }

    fn write_error(&self, step: &str, e: impl std::fmt::Display) -> TempliveError {
        TempliveError::StoreWriteError {
            path: self.path.clone(),
            reason: format!("Failed to {}: {}", step, e),
        }
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    fn put_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        // An unreadable file is replaced rather than blocking every future save
        let mut map = self.read_map().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "discarding unreadable store contents");
            BTreeMap::new()
        });
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.write_map(&map)
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.write_error("remove", e)),
        }
    }
}

/// Ensure parent directory exists and return it
fn ensure_parent_dir(path: &Path) -> Result<&Path> {
    let parent = path.parent().ok_or_else(|| TempliveError::StoreWriteError {
        path: path.to_path_buf(),
        reason: "Store path has no parent directory".to_string(),
    })?;
    std::fs::create_dir_all(parent).map_err(|e| TempliveError::StoreWriteError {
        path: path.to_path_buf(),
        reason: format!("Failed to create parent dir: {}", e),
    })?;
    Ok(parent)
}

/// Write content atomically using NamedTempFile + persist
fn atomic_write(content: &str, path: &Path, parent: &Path) -> Result<()> {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let write_error = |step: &str, e: &dyn std::fmt::Display| TempliveError::StoreWriteError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", step, e),
    };

    let mut temp_file =
        NamedTempFile::new_in(parent).map_err(|e| write_error("create temp file", &e))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| write_error("write temp file", &e))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| write_error("sync temp file", &e))?;

    temp_file
        .persist(path)
        .map_err(|e| write_error("persist temp file", &e))?;

    // Fsync parent directory for durability (Unix only)
    #[cfg(unix)]
    {
        let parent_file =
            std::fs::File::open(parent).map_err(|e| write_error("open parent dir", &e))?;
        parent_file
            .sync_all()
            .map_err(|e| write_error("sync parent dir", &e))?;
    }

    Ok(())
}

/// In-memory store, for tests and for running without a data directory
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, as when storage is full
    pub fn failing() -> Self {
        Self {
            entries: Mutex::default(),
            fail_writes: true,
        }
    }

    /// Seed the store with entries
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut map = store.entries.lock().unwrap_or_else(PoisonError::into_inner);
            for (key, value) in entries {
                map.insert(key.to_string(), value.to_string());
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(key).cloned())
    }

    fn put_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        if self.fail_writes {
            return Err(TempliveError::StoreWriteError {
                path: PathBuf::from("<memory>"),
                reason: "quota exceeded".to_string(),
            });
        }
        let mut map = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}
