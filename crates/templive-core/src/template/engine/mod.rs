//! Template engine implementation

mod helpers;
mod parse;
mod tokenize;

use crate::template::error::TemplateError;
use serde_json::Value;
use std::borrow::Cow;
use std::time::{Duration, Instant};

use helpers::{escape_html, is_truthy, resolve_segments, stringify_value};
use parse::{BlockKind, DataVar, Node, Path};

/// Maximum duration for template rendering (malformed input protection)
const RENDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Check if rendering has exceeded the timeout
fn check_timeout(start: Instant, max_duration: Duration) -> Result<(), TemplateError> {
    let elapsed = start.elapsed();
    if elapsed >= max_duration {
        return Err(TemplateError::Timeout {
            max_duration,
            elapsed,
        });
    }
    Ok(())
}

/// Position of the current {{#each}} iteration
#[derive(Debug, Clone, Copy)]
struct LoopMeta<'a> {
    index: usize,
    key: Option<&'a str>,
    first: bool,
    last: bool,
}

/// A context frame pushed by {{#each}} and {{#with}}
struct Scope<'a> {
    value: &'a Value,
    meta: Option<LoopMeta<'a>>,
}

/// Rendering state for a single render call
struct Renderer<'a> {
    root: &'a Value,
    scopes: Vec<Scope<'a>>,
    start: Instant,
    timeout: Duration,
}

impl<'a> Renderer<'a> {
    fn new(root: &'a Value, timeout: Duration) -> Self {
        Self {
            root,
            scopes: vec![Scope {
                value: root,
                meta: None,
            }],
            start: Instant::now(),
            timeout,
        }
    }

    /// Resolve a path that points into the data (not loop metadata)
    fn lookup_ref(&self, path: &Path) -> Option<&'a Value> {
        match path {
            Path::Scope { parents, segments } => {
                let index = self.scopes.len().checked_sub(1 + parents)?;
                resolve_segments(self.scopes[index].value, segments)
            }
            Path::Root { segments } => resolve_segments(self.root, segments),
            Path::Data(_) => None,
        }
    }

    fn lookup(&self, path: &Path) -> Option<Cow<'a, Value>> {
        let Path::Data(var) = path else {
            return self.lookup_ref(path).map(Cow::Borrowed);
        };

        let meta = self.scopes.iter().rev().find_map(|scope| scope.meta)?;
        let value = match var {
            DataVar::Index => Value::from(meta.index),
            DataVar::Key => match meta.key {
                Some(key) => Value::from(key),
                None => Value::from(meta.index),
            },
            DataVar::First => Value::Bool(meta.first),
            DataVar::Last => Value::Bool(meta.last),
        };
        Some(Cow::Owned(value))
    }

    fn render_nodes(&mut self, nodes: &[Node], output: &mut String) -> Result<(), TemplateError> {
        for node in nodes {
            check_timeout(self.start, self.timeout)?;
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Value { expr, path, escape } => {
                    if let Some(value) = self.lookup(path) {
                        let stringified = stringify_value(&value, expr)?;
                        if *escape {
                            escape_html(&stringified, output);
                        } else {
                            output.push_str(&stringified);
                        }
                    }
                }
                Node::Block {
                    kind,
                    path,
                    body,
                    inverse,
                } => self.render_block(*kind, path, body, inverse, output)?,
            }
        }
        Ok(())
    }

    fn render_block(
        &mut self,
        kind: BlockKind,
        path: &Path,
        body: &[Node],
        inverse: &[Node],
        output: &mut String,
    ) -> Result<(), TemplateError> {
        match kind {
            BlockKind::If | BlockKind::Unless => {
                let truthy = is_truthy(self.lookup(path).as_deref());
                if truthy == (kind == BlockKind::If) {
                    self.render_nodes(body, output)
                } else {
                    self.render_nodes(inverse, output)
                }
            }
            BlockKind::With => match self.lookup_ref(path) {
                Some(value) if is_truthy(Some(value)) => {
                    self.render_scoped(Scope { value, meta: None }, body, output)
                }
                _ => self.render_nodes(inverse, output),
            },
            BlockKind::Each => match self.lookup_ref(path) {
                Some(Value::Array(items)) if !items.is_empty() => {
                    let last = items.len() - 1;
                    for (index, value) in items.iter().enumerate() {
                        let meta = LoopMeta {
                            index,
                            key: None,
                            first: index == 0,
                            last: index == last,
                        };
                        self.render_scoped(Scope { value, meta: Some(meta) }, body, output)?;
                    }
                    Ok(())
                }
                Some(Value::Object(map)) if !map.is_empty() => {
                    let last = map.len() - 1;
                    for (index, (key, value)) in map.iter().enumerate() {
                        let meta = LoopMeta {
                            index,
                            key: Some(key.as_str()),
                            first: index == 0,
                            last: index == last,
                        };
                        self.render_scoped(Scope { value, meta: Some(meta) }, body, output)?;
                    }
                    Ok(())
                }
                _ => self.render_nodes(inverse, output),
            },
        }
    }

    fn render_scoped(
        &mut self,
        scope: Scope<'a>,
        body: &[Node],
        output: &mut String,
    ) -> Result<(), TemplateError> {
        self.scopes.push(scope);
        let result = self.render_nodes(body, output);
        self.scopes.pop();
        result
    }
}

/// A compiled template, ready to render against any data object
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
    timeout: Duration,
}

impl Template {
    /// Compile template text with the default engine settings
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        TemplateEngine::new().compile(source)
    }

    /// Render the template against a JSON data object
    pub fn render(&self, data: &Value) -> Result<String, TemplateError> {
        let mut output = String::new();
        Renderer::new(data, self.timeout).render_nodes(&self.nodes, &mut output)?;
        Ok(output)
    }
}

/// Template engine for compiling and rendering templates with JSON data
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    timeout: Duration,
}

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        Self {
            timeout: RENDER_TIMEOUT,
        }
    }

    /// Override the render timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Compile template text into a reusable [`Template`]
    pub fn compile(&self, source: &str) -> Result<Template, TemplateError> {
        let tokens = tokenize::tokenize(source)?;
        let nodes = parse::parse(tokens)?;
        Ok(Template {
            nodes,
            timeout: self.timeout,
        })
    }

    /// Compile and render in one step
    pub fn render(&self, source: &str, data: &Value) -> Result<String, TemplateError> {
        self.compile(source)?.render(data)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to render a template
pub fn render(template: &str, data: &Value) -> Result<String, TemplateError> {
    TemplateEngine::new().render(template, data)
}

#[cfg(test)]
mod tests;
