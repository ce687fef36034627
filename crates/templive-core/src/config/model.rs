use super::consts::{publish, store, timing, CONFIG_FILE_NAME};
use crate::debounce::DebouncePolicy;
use crate::error::{Result, TempliveError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// templive.toml schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub persist: PersistConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_preview_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_preview_debounce_ms(),
        }
    }
}

impl PreviewConfig {
    pub fn policy(&self) -> DebouncePolicy {
        DebouncePolicy::new(Duration::from_millis(self.debounce_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistConfig {
    #[serde(default = "default_persist_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_persist_max_wait_ms")]
    pub max_wait_ms: u64,
    /// Store file; defaults to the platform data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_persist_debounce_ms(),
            max_wait_ms: default_persist_max_wait_ms(),
            path: None,
        }
    }
}

impl PersistConfig {
    pub fn policy(&self) -> DebouncePolicy {
        DebouncePolicy::new(Duration::from_millis(self.debounce_ms))
            .with_max_wait(Duration::from_millis(self.max_wait_ms))
    }

    /// Resolve the store file path
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(store::APP_DIR).join(store::FILE_NAME))
            .ok_or(TempliveError::StoreUnavailable)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PublishConfig {
    /// Endpoint with the environment override applied
    pub fn resolved_endpoint(&self) -> String {
        std::env::var(publish::ENDPOINT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.endpoint.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_preview_debounce_ms() -> u64 {
    timing::PREVIEW_DEBOUNCE_MS
}

fn default_persist_debounce_ms() -> u64 {
    timing::PERSIST_DEBOUNCE_MS
}

fn default_persist_max_wait_ms() -> u64 {
    timing::PERSIST_MAX_WAIT_MS
}

fn default_endpoint() -> String {
    publish::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    publish::DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// Read and validate a templive.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| TempliveError::ConfigParseError(e.to_string()))?;

        let config: Self = toml::from_str(&content).map_err(|e| TempliveError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or `./templive.toml` if present, or defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.is_file() {
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.preview.debounce_ms == 0 {
            return Err(TempliveError::ConfigInvalidValue {
                field: "preview.debounce_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.persist.debounce_ms == 0 {
            return Err(TempliveError::ConfigInvalidValue {
                field: "persist.debounce_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.persist.max_wait_ms < self.persist.debounce_ms {
            return Err(TempliveError::ConfigInvalidValue {
                field: "persist.max_wait_ms".to_string(),
                reason: format!(
                    "must be at least persist.debounce_ms ({})",
                    self.persist.debounce_ms
                ),
            });
        }
        if self.publish.endpoint.trim().is_empty() {
            return Err(TempliveError::ConfigInvalidValue {
                field: "publish.endpoint".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
