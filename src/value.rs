//! Stored value helpers
//!
//! Variables hold `serde_json::Value`, a tagged union over null, bool, number,
//! string, list and (insertion-ordered) map. Nested access and text rendering
//! switch on that tag.

pub use serde_json::{Map, Value};

/// Renders a value the way it is substituted into surrounding text.
///
/// Strings are inserted raw, scalars use their JSON spelling and containers
/// are serialized as compact JSON.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Walks `segments` into `root`.
///
/// Object segments are field names; on lists a segment must parse as an index.
/// Returns `None` as soon as a segment is missing.
pub fn lookup_path<'a, S: AsRef<str>>(root: &'a Value, segments: &[S]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |current, segment| step(current, segment.as_ref()))
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Rough serialized size of a value in bytes.
pub fn size_estimate(value: &Value) -> usize {
    serde_json::to_vec(value).map(|bytes| bytes.len()).unwrap_or(0)
}
