use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TempliveError {
    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID: failed to parse {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // Store errors
    #[error("STORE_UNAVAILABLE: no data directory available for the snapshot store")]
    StoreUnavailable,

    #[error("STORE_READ_ERROR: failed to read {path}: {reason}")]
    StoreReadError { path: PathBuf, reason: String },

    #[error("STORE_WRITE_ERROR: failed to write {path}: {reason}")]
    StoreWriteError { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, TempliveError>;
