//! Tests for template engine
//!
//! Organized into focused submodules by feature area.

use super::*;

// Test helper functions
mod helpers;


// Rendering tests
mod render_basic;

// Error and edge case tests
mod errors;
