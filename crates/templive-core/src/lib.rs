// Core modules
pub mod compile;
pub mod config;
pub mod debounce;
pub mod defaults;
pub mod document;
pub mod error;
pub mod persist;
pub mod publish;
pub mod session;
pub mod store;
pub mod template;

// Re-export commonly used types
pub use error::{Result, TempliveError};
