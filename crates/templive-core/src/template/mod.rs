//! Template module - logic-less template engine for the live preview
//!
//! Markup templates are compiled once per settled edit and rendered against
//! the JSON data object the user edits alongside them.
//!
//! ## Syntax
//!
//! - Substitution: `{{key}}` (HTML-escaped) or `{{{key}}}` / `{{& key}}` (raw)
//! - Nested access: `{{user.name}}`, `{{items.0.title}}`, `{{this}}`, `{{../title}}`
//! - Loop metadata inside `each`: `{{@index}}`, `{{@key}}`, `{{@first}}`, `{{@last}}`
//! - Root access from any scope: `{{@root.title}}`
//! - Blocks: `{{#if key}}`, `{{#unless key}}`, `{{#each key}}`, `{{#with key}}`,
//!   each optionally with an `{{else}}` branch, closed by `{{/name}}`
//! - Comments: `{{! note }}` or `{{!-- note with }} inside --}}`
//! - Escape sequences: `\{{literal}}` renders `{{literal}}`
//!
//! Missing keys render as empty strings and count as falsy, so a template that
//! refers to data the user has not typed yet still renders.

pub mod engine;
pub mod error;

pub use engine::{render, Template, TemplateEngine};
pub use error::TemplateError;
