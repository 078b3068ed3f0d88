//! `$env` namespace: process environment variables.
//!
//! - `{{$env.API_TOKEN}}` - fails if unset
//! - `{{$env.API_TOKEN(fallback)}}` - `fallback` if unset

use std::env;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, StateError};

pub(super) const NAMESPACE: &str = "env";

static ENV_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Failed to compile env name regex")
});

pub(super) fn call(path: &str, args: &[String]) -> Result<String> {
    if path.is_empty() {
        return Err(StateError::invalid_argument(
            NAMESPACE,
            path,
            "environment variable name is required",
        ));
    }
    if !ENV_NAME_REGEX.is_match(path) {
        return Err(StateError::invalid_argument(
            NAMESPACE,
            path,
            format!("'{}' is not a valid environment variable name", path),
        ));
    }

    match env::var(path) {
        Ok(value) => Ok(value),
        Err(_) => args.first().cloned().ok_or_else(|| {
            StateError::invalid_argument(
                NAMESPACE,
                path,
                format!("environment variable '{}' is not set", path),
            )
        }),
    }
}
