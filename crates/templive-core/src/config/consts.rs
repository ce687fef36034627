//! Defaults and well-known names used across templive

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "templive.toml";

/// Debounce timings
pub mod timing {
    /// Quiet period before the preview recompiles
    pub const PREVIEW_DEBOUNCE_MS: u64 = 300;

    /// Quiet period before the documents are persisted
    pub const PERSIST_DEBOUNCE_MS: u64 = 1000;

    /// Longest a typing burst may postpone persistence
    pub const PERSIST_MAX_WAIT_MS: u64 = 5000;
}

/// Publish endpoint settings
pub mod publish {
    pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8787";

    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Overrides the configured endpoint
    pub const ENDPOINT_ENV: &str = "TEMPLIVE_PUBLISH_URL";

    /// Supplies the credential to the CLI
    pub const API_KEY_ENV: &str = "TEMPLIVE_API_KEY";
}

/// Snapshot store location under the platform data directory
pub mod store {
    pub const APP_DIR: &str = "templive";

    pub const FILE_NAME: &str = "store.json";
}
