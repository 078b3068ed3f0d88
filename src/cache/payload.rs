//! Response Payload Module
//!
//! What the cache stores. The cache itself only reads a status code and a URL;
//! everything else is carried opaquely.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{lookup_path, size_estimate, Value};

// == Cached Response Trait ==
/// A payload the response cache can store and query.
pub trait CachedResponse: Serialize {
    /// HTTP status code, used by `find_by_status`
    fn status(&self) -> u16;

    /// Request URL, used by `find_by_url`
    fn url(&self) -> &str;

    /// Approximate memory footprint, computed once when stored.
    fn size_estimate(&self) -> usize {
        serde_json::to_vec(self).map(|bytes| bytes.len()).unwrap_or(0)
    }
}

// == Response Payload ==
/// An executed request/response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub method: String,
    pub url: String,
    pub status: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Value,
    /// Round-trip time in milliseconds
    #[serde(default)]
    pub duration_ms: u64,
}

impl ResponsePayload {
    pub fn new(method: impl Into<String>, url: impl Into<String>, status: u16) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            status,
            headers: BTreeMap::new(),
            body: Value::Null,
            duration_ms: 0,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Pulls a value out of the response for request chaining.
    ///
    /// # Paths
    /// - `status`, `url`, `method`, `durationMs`
    /// - `headers.Name` - case-insensitive header
    /// - `body`, `body.user.id`, `$.user.id`, `$.items[0].id` - JSON body access
    pub fn extract(&self, path: &str) -> Option<Value> {
        let path = path.trim();
        match path {
            "status" => return Some(Value::from(self.status)),
            "url" => return Some(Value::from(self.url.clone())),
            "method" => return Some(Value::from(self.method.clone())),
            "durationMs" => return Some(Value::from(self.duration_ms)),
            "body" | "$" => return Some(self.body.clone()),
            _ => {}
        }

        if let Some(name) = path.strip_prefix("headers.") {
            return self.header(name).map(Value::from);
        }

        let body_path = path
            .strip_prefix("$.")
            .or_else(|| path.strip_prefix("body."))?;
        let segments: Vec<String> = body_path
            .split(['.', '['])
            .map(|s| s.trim_end_matches(']').trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        lookup_path(&self.body, &segments).cloned()
    }
}

impl CachedResponse for ResponsePayload {
    fn status(&self) -> u16 {
        self.status
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Untyped payloads: reads the `status` and `url` fields when present.
impl CachedResponse for Value {
    fn status(&self) -> u16 {
        self.get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(0)
    }

    fn url(&self) -> &str {
        self.get("url").and_then(Value::as_str).unwrap_or("")
    }

    fn size_estimate(&self) -> usize {
        size_estimate(self)
    }
}
