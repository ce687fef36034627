//! Shared helpers for templive CLI tests

#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo_bin;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory with its own templive.toml and store
pub struct Workspace {
    pub temp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_endpoint("http://127.0.0.1:9")
    }

    /// Workspace whose config publishes to `endpoint`
    pub fn with_endpoint(endpoint: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let store = temp.path().join("data").join("store.json");
        let config = format!(
            "[preview]\ndebounce_ms = 50\n\n[persist]\ndebounce_ms = 100\nmax_wait_ms = 500\npath = {:?}\n\n[publish]\nendpoint = {:?}\ntimeout_secs = 5\n",
            store.to_string_lossy(),
            endpoint
        );
        fs::write(temp.path().join("templive.toml"), config).expect("Failed to write config");
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    pub fn store_path(&self) -> PathBuf {
        self.path("data/store.json")
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    /// `templive` with this workspace's config and a clean environment
    pub fn templive(&self) -> Command {
        let mut cmd = Command::new(cargo_bin!("templive"));
        cmd.current_dir(self.root())
            .arg("--config")
            .arg(self.path("templive.toml"))
            .env_remove("TEMPLIVE_API_KEY")
            .env_remove("TEMPLIVE_PUBLISH_URL")
            .env_remove("TEMPLIVE_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Stored documents as a JSON object
    pub fn stored(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.store_path()).expect("store file exists");
        serde_json::from_str(&content).expect("store is JSON")
    }
}
