//! Placeholder parser
//!
//! Turns `GET {{baseUrl}}/users/{{user.id}}?t={{$date.timestamp}}` into a flat
//! list of literal and placeholder segments. `\{{` and `\}}` produce literal
//! braces.

use crate::builtins::parse_call;
use crate::error::{Result, StateError};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

// == Segments ==
/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Placeholder(Expr),
}

/// The content of a `{{...}}` span.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `a.b.0` - first segment is looked up in scope, the rest walk into it
    Variable { path: Vec<String> },
    /// `$namespace.path(args)`
    Builtin {
        namespace: String,
        path: String,
        args: Vec<String>,
    },
}

impl Expr {
    /// Source-like spelling, used in error messages.
    pub fn display_name(&self) -> String {
        match self {
            Expr::Variable { path } => path.join("."),
            Expr::Builtin {
                namespace, path, ..
            } if path.is_empty() => format!("${}", namespace),
            Expr::Builtin {
                namespace, path, ..
            } => format!("${}.{}", namespace, path),
        }
    }
}

/// True if `text` may hold a placeholder or an escaped brace pair.
pub fn has_placeholders(text: &str) -> bool {
    text.contains(OPEN) || text.contains("\\}}")
}

/// Splits `input` into literal text and placeholders, left to right.
///
/// A span runs from `{{` to the next `}}`. If another `{{` appears before that
/// close, the earlier braces are literal text and the innermost opening wins,
/// so a span never contains braces. An opening without a close is literal.
pub fn parse(input: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("\\{{") {
            literal.push_str(OPEN);
            rest = after;
            continue;
        }
        if let Some(after) = rest.strip_prefix("\\}}") {
            literal.push_str(CLOSE);
            rest = after;
            continue;
        }

        if rest.starts_with(OPEN) {
            let Some(close) = rest[OPEN.len()..].find(CLOSE).map(|i| i + OPEN.len()) else {
                literal.push_str(rest);
                break;
            };

            // innermost opening before the close
            let open = rest[..close].rfind(OPEN).unwrap_or(0);
            if open > 0 && rest.as_bytes()[open - 1] == b'\\' {
                // escaped inner opening: everything up to the close is literal
                literal.push_str(&rest[..open - 1]);
                literal.push_str(OPEN);
                rest = &rest[open + OPEN.len()..];
                continue;
            }
            literal.push_str(&rest[..open]);

            let body = &rest[open + OPEN.len()..close];
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(parse_expr(body)?));
            rest = &rest[close + CLOSE.len()..];
            continue;
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            literal.push(c);
        }
        rest = chars.as_str();
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Parses the trimmed body of one placeholder span.
pub fn parse_expr(body: &str) -> Result<Expr> {
    let expr = body.trim();
    if expr.is_empty() {
        return Err(StateError::InvalidPlaceholder(
            "empty placeholder '{{}}'".to_string(),
        ));
    }

    match expr.strip_prefix('$') {
        Some(call) => parse_builtin(call),
        None => parse_variable(expr),
    }
}

fn parse_builtin(call: &str) -> Result<Expr> {
    let split = call.find(['.', '(']).unwrap_or(call.len());
    let namespace = call[..split].trim();
    if namespace.is_empty() || !namespace.chars().all(is_ident_char) {
        return Err(StateError::InvalidPlaceholder(format!(
            "invalid builtin namespace in '${}'",
            call
        )));
    }

    let remainder = call[split..].strip_prefix('.').unwrap_or(&call[split..]);
    let (path, args) = parse_call(remainder)?;
    Ok(Expr::Builtin {
        namespace: namespace.to_string(),
        path,
        args,
    })
}

/// Splits `a.b[0].c` into `["a", "b", "0", "c"]`.
fn parse_variable(expr: &str) -> Result<Expr> {
    let mut path = Vec::new();
    for dotted in expr.split('.') {
        let mut parts = dotted.split('[');
        let head = parts.next().unwrap_or_default().trim();
        if !head.is_empty() {
            path.push(head.to_string());
        } else if path.is_empty() || !dotted.contains('[') {
            return Err(StateError::InvalidPlaceholder(format!(
                "empty path segment in '{{{{{}}}}}'",
                expr
            )));
        }
        for index in parts {
            let index = index
                .strip_suffix(']')
                .map(str::trim)
                .filter(|i| !i.is_empty())
                .ok_or_else(|| {
                    StateError::InvalidPlaceholder(format!(
                        "malformed index in '{{{{{}}}}}'",
                        expr
                    ))
                })?;
            path.push(index.to_string());
        }
    }
    Ok(Expr::Variable { path })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
