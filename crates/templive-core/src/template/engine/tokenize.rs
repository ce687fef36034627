//! Tokenization for template engine
//!
//! Splits template text into literal text and `{{...}}` tags in a single
//! forward pass. Backslash escapes are folded into the text tokens here so the
//! parser only ever sees real tags.

use crate::template::error::TemplateError;

/// Token classification
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// Literal text, escapes already resolved
    Text(String),

    /// {{key}}, {{{key}}} or {{& key}}
    Value { expr: String, escape: bool },

    /// {{#if key}}, {{#each items}}, ...
    BlockStart { keyword: String, args: String },

    /// {{else}}
    Else,

    /// {{/if}}, {{/each}}, ...
    BlockEnd { keyword: String },

    /// {{! ... }} or {{!-- ... --}}
    Comment,
}

/// A single token with the line it starts on (for error messages)
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

/// Count newlines in text
pub(crate) fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

/// Count backslashes immediately before a position
fn count_backslashes_before(text: &str, pos: usize) -> usize {
    text.as_bytes()[..pos]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count()
}

/// Closing delimiter and content offset for the tag opening at `open`
fn tag_delimiters(text: &str, open: usize) -> (usize, &'static str) {
    let after = &text[open + 2..];
    if after.starts_with("!--") {
        (open + 5, "--}}")
    } else if after.starts_with('{') {
        (open + 3, "}}}")
    } else {
        (open + 2, "}}")
    }
}

/// Classify the trimmed content of a tag
fn classify(content: &str, triple: bool, line: usize) -> Result<TokenKind, TemplateError> {
    if triple {
        return value_token(content, false, line);
    }

    if content.starts_with('!') {
        return Ok(TokenKind::Comment);
    }

    if let Some(rest) = content.strip_prefix('&') {
        return value_token(rest.trim(), false, line);
    }

    if let Some(rest) = content.strip_prefix('#') {
        let rest = rest.trim_start();
        let (keyword, args) = match rest.find(char::is_whitespace) {
            Some(split) => (&rest[..split], rest[split..].trim()),
            None => (rest, ""),
        };
        if keyword.is_empty() {
            return Err(TemplateError::MalformedSyntax {
                message: "Missing block helper name after '#'".to_string(),
                line,
            });
        }
        return Ok(TokenKind::BlockStart {
            keyword: keyword.to_string(),
            args: args.to_string(),
        });
    }

    if let Some(rest) = content.strip_prefix('/') {
        return Ok(TokenKind::BlockEnd {
            keyword: rest.trim().to_string(),
        });
    }

    if content == "else" {
        return Ok(TokenKind::Else);
    }

    value_token(content, true, line)
}

fn value_token(expr: &str, escape: bool, line: usize) -> Result<TokenKind, TemplateError> {
    if expr.is_empty() {
        return Err(TemplateError::MalformedSyntax {
            message: "Empty expression".to_string(),
            line,
        });
    }

    // `{{name arg}}` is a helper call; no helpers are registered
    if let Some(split) = expr.find(char::is_whitespace) {
        return Err(TemplateError::UnknownHelper {
            name: expr[..split].to_string(),
            line,
        });
    }

    Ok(TokenKind::Value {
        expr: expr.to_string(),
        escape,
    })
}

/// Tokenize a template
///
/// An odd number of backslashes before `{{` makes the tag literal; every pair
/// of backslashes collapses to one.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut buffer_line = 1;
    let mut line = 1;
    let mut pos = 0;

    while let Some(rel) = text[pos..].find("{{") {
        let open = pos + rel;
        let backslash_count = count_backslashes_before(&text[pos..], rel);
        let text_end = open - backslash_count;

        // Output text before backslashes, then half of the backslashes
        buffer.push_str(&text[pos..text_end]);
        line += count_newlines(&text[pos..text_end]);
        for _ in 0..(backslash_count / 2) {
            buffer.push('\\');
        }

        if backslash_count % 2 == 1 {
            // Escaped tag: copy it through its closing braces verbatim
            let end = text[open + 2..]
                .find("}}")
                .map(|close| open + 2 + close + 2)
                .unwrap_or(text.len());
            buffer.push_str(&text[open..end]);
            line += count_newlines(&text[open..end]);
            pos = end;
            continue;
        }

        if !buffer.is_empty() {
            tokens.push(Token {
                kind: TokenKind::Text(std::mem::take(&mut buffer)),
                line: buffer_line,
            });
        }

        let (content_start, closing) = tag_delimiters(text, open);
        let close = text[content_start..]
            .find(closing)
            .ok_or_else(|| TemplateError::MalformedSyntax {
                message: "Unclosed tag: expected closing '}}'".to_string(),
                line,
            })?;
        let content = text[content_start..content_start + close].trim();
        let end = content_start + close + closing.len();

        let kind = if closing == "--}}" {
            TokenKind::Comment
        } else {
            classify(content, closing == "}}}", line)?
        };
        tokens.push(Token { kind, line });

        line += count_newlines(&text[open..end]);
        buffer_line = line;
        pos = end;
    }

    buffer.push_str(&text[pos..]);
    if !buffer.is_empty() {
        tokens.push(Token {
            kind: TokenKind::Text(buffer),
            line: buffer_line,
        });
    }

    Ok(tokens)
}
