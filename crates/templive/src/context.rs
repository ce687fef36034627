//! Global context for CLI commands

use anyhow::{Context as _, Result};
use std::path::Path;
use templive_core::config::Config;
use templive_core::store::FileStore;

/// Loaded configuration shared by every command
pub struct Context {
    pub config: Config,
    pub verbose: bool,
}

impl Context {
    /// Load `config_path`, or `./templive.toml`, or built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit or local config file cannot be read,
    /// parsed or validated
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self> {
        let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
        Ok(Self { config, verbose })
    }

    /// File store at the configured or default location
    pub fn store(&self) -> Result<FileStore> {
        let path = self.config.persist.store_path()?;
        if self.verbose {
            tracing::debug!(path = %path.display(), "using snapshot store");
        }
        Ok(FileStore::new(path))
    }
}
