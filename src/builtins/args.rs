//! Builtin call parsing
//!
//! Splits `path(arg, "quoted, arg", 3)` into a path and its argument list.

use crate::error::{Result, StateError};

const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Upper bound on the length of generated text, in bytes or characters.
pub(crate) const MAX_GENERATED_LEN: usize = 1 << 20;

/// Splits a call expression into its path and arguments.
///
/// `upper` has no arguments, `int(1, 10)` has two. Unbalanced parentheses are
/// rejected.
pub fn parse_call(expr: &str) -> Result<(String, Vec<String>)> {
    let expr = expr.trim();
    let Some(open) = expr.find('(') else {
        if expr.contains(')') {
            return Err(StateError::InvalidPlaceholder(format!(
                "unexpected ')' in '{}'",
                expr
            )));
        }
        return Ok((expr.to_string(), Vec::new()));
    };

    if !expr.ends_with(')') {
        return Err(StateError::InvalidPlaceholder(format!(
            "unclosed argument list in '{}'",
            expr
        )));
    }

    let path = expr[..open].trim().to_string();
    let inner = &expr[open + 1..expr.len() - 1];
    Ok((path, split_args(inner)?))
}

/// Splits an argument list on top-level commas.
///
/// Commas inside quotes or nested parentheses do not split. Each argument is
/// trimmed and loses one pair of matching outer quotes. Numeric text is kept
/// as-is.
pub fn split_args(inner: &str) -> Result<Vec<String>> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == '\\' {
                    // keep the escape so strip_quotes can see the raw text
                    current.push(c);
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                    continue;
                }
                if c == q {
                    quote = None;
                }
                current.push(c);
            }
            None => match c {
                c if QUOTES.contains(&c) => {
                    quote = Some(c);
                    current.push(c);
                }
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        StateError::InvalidPlaceholder(format!(
                            "unbalanced ')' in arguments '{}'",
                            inner
                        ))
                    })?;
                    current.push(c);
                }
                ',' if depth == 0 => {
                    args.push(clean_arg(&current));
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }

    if let Some(q) = quote {
        return Err(StateError::InvalidPlaceholder(format!(
            "unterminated {} quote in arguments '{}'",
            q, inner
        )));
    }
    if depth != 0 {
        return Err(StateError::InvalidPlaceholder(format!(
            "unbalanced '(' in arguments '{}'",
            inner
        )));
    }

    args.push(clean_arg(&current));
    Ok(args)
}

fn clean_arg(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && QUOTES.contains(&first) => {
            let body = &trimmed[first.len_utf8()..trimmed.len() - last.len_utf8()];
            body.replace(&format!("\\{}", first), &first.to_string())
        }
        _ => trimmed.to_string(),
    }
}

// == Handler helpers ==

/// Reads argument `index` as an integer, falling back to `default` when absent.
pub(crate) fn int_arg(
    namespace: &str,
    path: &str,
    args: &[String],
    index: usize,
    default: i64,
) -> Result<i64> {
    match args.get(index) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            StateError::invalid_argument(
                namespace,
                path,
                format!("argument {} must be an integer, got '{}'", index + 1, raw),
            )
        }),
    }
}

/// Reads argument `index` as a length or count in `0..=MAX_GENERATED_LEN`.
pub(crate) fn len_arg(
    namespace: &str,
    path: &str,
    args: &[String],
    index: usize,
    default: i64,
) -> Result<usize> {
    let len = int_arg(namespace, path, args, index, default)?;
    match usize::try_from(len) {
        Ok(len) if len <= MAX_GENERATED_LEN => Ok(len),
        Ok(_) => Err(StateError::invalid_argument(
            namespace,
            path,
            format!("length must be at most {}, got {}", MAX_GENERATED_LEN, len),
        )),
        Err(_) => Err(StateError::invalid_argument(
            namespace,
            path,
            format!("length must not be negative, got {}", len),
        )),
    }
}

/// Reads argument `index` as a number. Missing arguments are an error.
pub(crate) fn num_arg(namespace: &str, path: &str, args: &[String], index: usize) -> Result<f64> {
    let raw = args.get(index).ok_or_else(|| {
        StateError::invalid_argument(
            namespace,
            path,
            format!("expected at least {} argument(s)", index + 1),
        )
    })?;
    raw.trim().parse().map_err(|_| {
        StateError::invalid_argument(
            namespace,
            path,
            format!("argument {} must be a number, got '{}'", index + 1, raw),
        )
    })
}

/// Reads argument `index` as text. Missing arguments are an error.
pub(crate) fn str_arg<'a>(
    namespace: &str,
    path: &str,
    args: &'a [String],
    index: usize,
) -> Result<&'a str> {
    args.get(index).map(String::as_str).ok_or_else(|| {
        StateError::invalid_argument(
            namespace,
            path,
            format!("expected at least {} argument(s)", index + 1),
        )
    })
}
