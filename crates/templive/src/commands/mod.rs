//! CLI command implementations

pub mod live;
pub mod publish;
pub mod render;
pub mod snapshot;
