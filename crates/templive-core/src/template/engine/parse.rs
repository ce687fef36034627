//! Parsing tokens into a block tree

use super::tokenize::{Token, TokenKind};
use crate::template::error::TemplateError;

/// Maximum block nesting depth
pub(crate) const MAX_DEPTH: usize = 64;

/// Loop metadata variables available inside {{#each}}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataVar {
    Index,
    Key,
    First,
    Last,
}

/// A parsed lookup expression
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Path {
    /// `a.b`, `this`, `../a`: resolved against the scope `parents` levels up
    Scope {
        parents: usize,
        segments: Vec<String>,
    },
    /// `@root.a.b`
    Root { segments: Vec<String> },
    /// `@index`, `@key`, `@first`, `@last`
    Data(DataVar),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    If,
    Unless,
    Each,
    With,
}

impl BlockKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "if" => Some(BlockKind::If),
            "unless" => Some(BlockKind::Unless),
            "each" => Some(BlockKind::Each),
            "with" => Some(BlockKind::With),
            _ => None,
        }
    }

    pub(crate) fn keyword(self) -> &'static str {
        match self {
            BlockKind::If => "if",
            BlockKind::Unless => "unless",
            BlockKind::Each => "each",
            BlockKind::With => "with",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Value {
        expr: String,
        path: Path,
        escape: bool,
    },
    Block {
        kind: BlockKind,
        path: Path,
        body: Vec<Node>,
        inverse: Vec<Node>,
    },
}

/// Parse a lookup expression such as `user.name`, `../title` or `@index`
pub(crate) fn parse_path(expr: &str, line: usize) -> Result<Path, TemplateError> {
    let invalid = || TemplateError::MalformedSyntax {
        message: format!("Invalid path '{}'", expr),
        line,
    };

    if let Some(rest) = expr.strip_prefix("@root") {
        let segments = match rest {
            "" => Vec::new(),
            _ => split_segments(rest.strip_prefix('.').ok_or_else(invalid)?).ok_or_else(invalid)?,
        };
        return Ok(Path::Root { segments });
    }

    if let Some(name) = expr.strip_prefix('@') {
        let var = match name {
            "index" => DataVar::Index,
            "key" => DataVar::Key,
            "first" => DataVar::First,
            "last" => DataVar::Last,
            _ => {
                return Err(TemplateError::MalformedSyntax {
                    message: format!("Unknown data variable '@{}'", name),
                    line,
                });
            }
        };
        return Ok(Path::Data(var));
    }

    let mut rest = expr;
    let mut parents = 0;
    while let Some(stripped) = rest.strip_prefix("../") {
        parents += 1;
        rest = stripped;
    }
    if rest == ".." {
        parents += 1;
        rest = "";
    }
    let rest = rest.strip_prefix("./").unwrap_or(rest);

    let segments = match rest {
        "" | "." | "this" => Vec::new(),
        _ => {
            let rest = rest.strip_prefix("this.").unwrap_or(rest);
            split_segments(rest).ok_or_else(invalid)?
        }
    };

    Ok(Path::Scope { parents, segments })
}

fn split_segments(path: &str) -> Option<Vec<String>> {
    let segments: Vec<String> = path.split('.').map(str::to_string).collect();
    if segments.iter().any(|s| s.is_empty()) {
        None
    } else {
        Some(segments)
    }
}

/// Block being collected while its closing tag is pending
struct OpenBlock {
    kind: BlockKind,
    path: Path,
    line: usize,
    body: Vec<Node>,
    inverse: Option<Vec<Node>>,
}

impl OpenBlock {
    fn nodes(&mut self) -> &mut Vec<Node> {
        match self.inverse.as_mut() {
            Some(inverse) => inverse,
            None => &mut self.body,
        }
    }
}

fn current<'a>(root: &'a mut Vec<Node>, stack: &'a mut [OpenBlock]) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(block) => block.nodes(),
        None => root,
    }
}

/// Build the node tree, matching every block with its closing tag
pub(crate) fn parse(tokens: Vec<Token>) -> Result<Vec<Node>, TemplateError> {
    let mut root = Vec::new();
    let mut stack: Vec<OpenBlock> = Vec::new();

    for token in tokens {
        let line = token.line;
        match token.kind {
            TokenKind::Text(text) => current(&mut root, &mut stack).push(Node::Text(text)),
            TokenKind::Comment => {}
            TokenKind::Value { expr, escape } => {
                let path = parse_path(&expr, line)?;
                current(&mut root, &mut stack).push(Node::Value { expr, path, escape });
            }
            TokenKind::BlockStart { keyword, args } => {
                let kind = BlockKind::from_keyword(&keyword).ok_or_else(|| {
                    TemplateError::UnknownHelper {
                        name: keyword.clone(),
                        line,
                    }
                })?;
                if args.is_empty() {
                    return Err(TemplateError::MalformedSyntax {
                        message: format!("{{{{#{}}}}} requires an argument", keyword),
                        line,
                    });
                }
                if args.contains(char::is_whitespace) {
                    return Err(TemplateError::MalformedSyntax {
                        message: format!("{{{{#{}}}}} takes a single path, got '{}'", keyword, args),
                        line,
                    });
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(TemplateError::NestingTooDeep {
                        max_depth: MAX_DEPTH,
                        line,
                    });
                }
                let path = parse_path(&args, line)?;
                if matches!(path, Path::Data(_)) && matches!(kind, BlockKind::Each | BlockKind::With)
                {
                    return Err(TemplateError::MalformedSyntax {
                        message: format!("'{}' cannot be used as {{{{#{}}}}} context", args, keyword),
                        line,
                    });
                }
                stack.push(OpenBlock {
                    kind,
                    path,
                    line,
                    body: Vec::new(),
                    inverse: None,
                });
            }
            TokenKind::Else => match stack.last_mut() {
                Some(block) if block.inverse.is_none() => block.inverse = Some(Vec::new()),
                _ => {
                    return Err(TemplateError::MalformedSyntax {
                        message: "Unexpected {{else}} outside of a block".to_string(),
                        line,
                    });
                }
            },
            TokenKind::BlockEnd { keyword } => {
                let block = stack.pop().ok_or_else(|| TemplateError::MalformedSyntax {
                    message: format!(
                        "Unexpected {{{{/{}}}}} without matching {{{{#{}}}}}",
                        keyword, keyword
                    ),
                    line,
                })?;
                if block.kind.keyword() != keyword {
                    return Err(TemplateError::MalformedSyntax {
                        message: format!(
                            "Expected {{{{/{}}}}} to close block opened at line {}, found {{{{/{}}}}}",
                            block.kind.keyword(),
                            block.line,
                            keyword
                        ),
                        line,
                    });
                }
                let node = Node::Block {
                    kind: block.kind,
                    path: block.path,
                    body: block.body,
                    inverse: block.inverse.unwrap_or_default(),
                };
                current(&mut root, &mut stack).push(node);
            }
        }
    }

    if let Some(block) = stack.pop() {
        return Err(TemplateError::MalformedSyntax {
            message: format!("Unclosed {{{{#{}}}}} block", block.kind.keyword()),
            line: block.line,
        });
    }

    Ok(root)
}
