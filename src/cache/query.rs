//! URL matching for cache queries

use regex::Regex;

use crate::error::{Result, StateError};

// == Url Matcher ==
/// How `find_by_url` compares stored URLs.
///
/// Plain strings match by substring containment; compiled patterns match
/// anywhere in the URL unless anchored.
#[derive(Debug, Clone)]
pub enum UrlMatcher {
    Substring(String),
    Pattern(Regex),
}

impl UrlMatcher {
    /// Compiles `pattern` into a regular-expression matcher.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(UrlMatcher::Pattern)
            .map_err(|e| StateError::InvalidPattern(format!("{}: {}", pattern, e)))
    }

    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlMatcher::Substring(needle) => url.contains(needle.as_str()),
            UrlMatcher::Pattern(regex) => regex.is_match(url),
        }
    }
}

impl From<&str> for UrlMatcher {
    fn from(needle: &str) -> Self {
        UrlMatcher::Substring(needle.to_string())
    }
}

impl From<String> for UrlMatcher {
    fn from(needle: String) -> Self {
        UrlMatcher::Substring(needle)
    }
}

impl From<Regex> for UrlMatcher {
    fn from(regex: Regex) -> Self {
        UrlMatcher::Pattern(regex)
    }
}

impl From<&Regex> for UrlMatcher {
    fn from(regex: &Regex) -> Self {
        UrlMatcher::Pattern(regex.clone())
    }
}
