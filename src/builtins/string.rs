//! `$string` namespace: casing and encoding helpers.
//!
//! The first argument is the input text: `{{$string.upper(hello)}}` -> `HELLO`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::args::{len_arg, str_arg, MAX_GENERATED_LEN};
use super::unknown_function;
use crate::error::{Result, StateError};

pub(super) const NAMESPACE: &str = "string";

pub(super) fn call(path: &str, args: &[String]) -> Result<String> {
    let input = str_arg(NAMESPACE, path, args, 0)?;
    match path {
        "upper" | "uppercase" => Ok(input.to_uppercase()),
        "lower" | "lowercase" => Ok(input.to_lowercase()),
        "capitalize" => Ok(capitalize(input)),
        "camel" | "camelCase" => Ok(camel_case(input)),
        "snake" | "snakeCase" => Ok(join_words(input, "_")),
        "kebab" | "kebabCase" => Ok(join_words(input, "-")),
        "trim" => Ok(input.trim().to_string()),
        "reverse" => Ok(input.chars().rev().collect()),
        "length" => Ok(input.chars().count().to_string()),
        "repeat" => {
            let times = len_arg(NAMESPACE, path, args, 1, 1)?;
            match input.len().checked_mul(times) {
                Some(total) if total <= MAX_GENERATED_LEN => Ok(input.repeat(times)),
                _ => Err(StateError::invalid_argument(
                    NAMESPACE,
                    path,
                    format!("repeated text would exceed {} bytes", MAX_GENERATED_LEN),
                )),
            }
        }
        "base64" => Ok(STANDARD.encode(input.as_bytes())),
        "unbase64" => {
            let bytes = STANDARD.decode(input.trim()).map_err(|e| {
                StateError::invalid_argument(NAMESPACE, path, format!("invalid base64: {}", e))
            })?;
            String::from_utf8(bytes).map_err(|_| {
                StateError::invalid_argument(NAMESPACE, path, "decoded bytes are not UTF-8")
            })
        }
        _ => Err(unknown_function(NAMESPACE, path)),
    }
}

fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Splits on non-alphanumerics and lower-to-upper boundaries.
fn words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in input.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn join_words(input: &str, separator: &str) -> String {
    words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(separator)
}

fn camel_case(input: &str) -> String {
    words(input)
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let lower = w.to_lowercase();
            if i == 0 {
                lower
            } else {
                capitalize(&lower)
            }
        })
        .collect()
}
