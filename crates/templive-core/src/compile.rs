//! Fail-soft template compilation for the live preview
//!
//! The preview must always show something. A template that fails to compile
//! or render leaves the last successful output on screen (or the raw template
//! text if nothing has rendered yet) and the failure goes to the log.

use crate::template::{TemplateEngine, TemplateError};
use serde_json::Value;

/// Compiles markup against the data object, remembering the last good output
#[derive(Debug, Clone, Default)]
pub struct TemplateCompiler {
    engine: TemplateEngine,
    last_good: Option<String>,
    last_error: Option<TemplateError>,
}

impl TemplateCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom engine (e.g. a shorter render timeout)
    pub fn with_engine(engine: TemplateEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Render `template` against `data`, never failing
    ///
    /// Returns the fresh output on success. On failure returns the previous
    /// successful output, or `template` unmodified if there is none.
    pub fn render(&mut self, template: &str, data: &Value) -> String {
        let result = self
            .engine
            .compile(template)
            .and_then(|compiled| compiled.render(data));

        match result {
            Ok(output) => {
                self.last_error = None;
                self.last_good = Some(output.clone());
                output
            }
            Err(err) => {
                let phase = if err.is_compile_error() {
                    "compile"
                } else {
                    "render"
                };
                tracing::warn!(phase, error = %err, "template failed, keeping last good output");
                self.last_error = Some(err);
                self.last_good
                    .clone()
                    .unwrap_or_else(|| template.to_string())
            }
        }
    }

    /// Most recent successful output, if any
    pub fn last_good(&self) -> Option<&str> {
        self.last_good.as_deref()
    }

    /// Error from the most recent render, cleared by the next success
    pub fn last_error(&self) -> Option<&TemplateError> {
        self.last_error.as_ref()
    }
}
