//! HTTP publishing of templates for templive.
//!
//! [`PublishClient`] implements [`templive_core::publish::Publisher`] against
//! a remote service:
//!
//! ```text
//! POST {endpoint}/publish
//! Authorization: <credential>
//! Content-Type: application/json
//!
//! {"body": "<markup>", "styles": "<stylesheet>"}
//! ```
//!
//! A 2xx response carrying `{"template": "<id>"}` is a success. Every other
//! outcome collapses into one user-facing failure; the underlying
//! [`PublishError`] is only logged.

pub mod client;
pub mod endpoint;
pub mod error;

pub use client::PublishClient;
pub use error::PublishError;
