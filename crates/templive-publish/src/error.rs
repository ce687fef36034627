//! Publish error types

use thiserror::Error;

/// Why a publish did not produce a template id
///
/// These are logged, never shown; users see a single generic message.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Endpoint from configuration is not a usable base URL
    #[error("Invalid publish endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Request could not be sent or the response could not be read
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Publish rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Success status but the body is not `{"template": "<id>"}`
    #[error("Invalid publish response: {0}")]
    InvalidResponse(String),
}
