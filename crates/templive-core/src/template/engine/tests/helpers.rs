//! Shared test helpers for template engine tests

use serde_json::{json, Value};

/// Simple data object with scalar values
pub(super) fn simple_data() -> Value {
    json!({
        "title": "My Title",
        "count": 42,
        "price": 9.99,
        "enabled": true,
        "nothing": null,
    })
}

/// Nested data object with arrays and objects
pub(super) fn nested_data() -> Value {
    json!({
        "page": {
            "title": "Release Notes",
            "language": "en",
            "authors": [
                { "name": "John Doe", "email": "john@example.com" },
                { "name": "Jane Smith", "email": "jane@example.com" }
            ]
        },
        "tags": ["rust", "templates"],
        "links": { "home": "/", "docs": "/docs" }
    })
}
