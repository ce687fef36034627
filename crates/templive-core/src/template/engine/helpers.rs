//! Helper functions for template rendering

use crate::template::error::TemplateError;
use serde_json::Value;

/// Resolve dotted segments from a JSON value
///
/// Numeric segments index into arrays (`items.0.name`).
pub(crate) fn resolve_segments<'a>(data: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = data;

    for part in segments {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Stringify a JSON value for template output
pub(crate) fn stringify_value(value: &Value, key: &str) -> Result<String, TemplateError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Array(_) => Err(TemplateError::ArrayInNonEachContext {
            key: key.to_string(),
        }),
        Value::Object(_) => Err(TemplateError::ObjectInPlaceholder {
            key: key.to_string(),
        }),
    }
}

/// Block truthiness: `false`, `null`, `0`, `""` and `[]` are falsy
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(_)) => true,
    }
}

/// Escape text for inclusion in HTML
pub(crate) fn escape_html(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            '`' => output.push_str("&#x60;"),
            '=' => output.push_str("&#x3D;"),
            _ => output.push(c),
        }
    }
}
