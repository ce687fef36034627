//! Template error types

use std::fmt;

/// Template compile and render errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Malformed template syntax
    MalformedSyntax {
        /// Error message
        message: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Block or expression names a helper the engine does not provide
    UnknownHelper {
        /// The helper name as written
        name: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Blocks nested deeper than the engine allows
    NestingTooDeep {
        /// Maximum allowed block depth
        max_depth: usize,
        /// Line number of the block that exceeded the limit
        line: usize,
    },

    /// Array used in a substitution instead of an {{#each}} block
    ArrayInNonEachContext {
        /// The expression that resolved to an array
        key: String,
    },

    /// Object used in a substitution (must use nested keys)
    ObjectInPlaceholder {
        /// The expression that resolved to an object
        key: String,
    },

    /// Template rendering timed out (malformed input protection)
    Timeout {
        /// Maximum allowed duration
        max_duration: std::time::Duration,
        /// Actual elapsed time
        elapsed: std::time::Duration,
    },
}

impl TemplateError {
    /// Whether the error was raised while compiling rather than rendering
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            TemplateError::MalformedSyntax { .. }
                | TemplateError::UnknownHelper { .. }
                | TemplateError::NestingTooDeep { .. }
        )
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::MalformedSyntax { message, line } => {
                write!(f, "Malformed syntax at line {}: {}", line, message)
            }
            TemplateError::UnknownHelper { name, line } => {
                write!(f, "Unknown helper '{}' at line {}", name, line)
            }
            TemplateError::NestingTooDeep { max_depth, line } => {
                write!(
                    f,
                    "Blocks nested deeper than {} levels at line {}",
                    max_depth, line
                )
            }
            TemplateError::ArrayInNonEachContext { key } => {
                write!(
                    f,
                    "Array '{}' used outside of {{{{#each}}}} context. Use {{{{#each {}}}}} ... {{{{/each}}}}",
                    key, key
                )
            }
            TemplateError::ObjectInPlaceholder { key } => {
                write!(
                    f,
                    "Object '{}' cannot be used directly in placeholder. Use nested keys like {}.field",
                    key, key
                )
            }
            TemplateError::Timeout {
                max_duration,
                elapsed,
            } => {
                write!(
                    f,
                    "Template rendering timed out after {:.2}s (max: {:.2}s)",
                    elapsed.as_secs_f64(),
                    max_duration.as_secs_f64()
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}
