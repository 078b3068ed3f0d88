//! Configuration Module
//!
//! Construction-time options for the response cache, loadable from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{Result, StateError};

/// Response cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of live entries the cache can hold
    pub max_size: usize,
    /// Default TTL in milliseconds, None = entries never expire
    pub default_ttl_ms: Option<u64>,
    /// Whether a background sweep purges expired entries
    pub enable_cleanup: bool,
    /// Background sweep interval in milliseconds
    pub cleanup_interval_ms: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_STATE_CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `API_STATE_CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: none)
    /// - `API_STATE_CACHE_CLEANUP` - Enable background cleanup, `true`/`1` (default: false)
    /// - `API_STATE_CACHE_CLEANUP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 60000)
    ///
    /// A TTL that is set but is not a non-negative integer is an error, since
    /// falling back would silently disable expiry.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_size: env::var("API_STATE_CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_size),
            default_ttl_ms: env::var("API_STATE_CACHE_DEFAULT_TTL_MS")
                .ok()
                .map(|v| parse_ttl(&v))
                .transpose()?,
            enable_cleanup: env::var("API_STATE_CACHE_CLEANUP")
                .ok()
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.enable_cleanup),
            cleanup_interval_ms: env::var("API_STATE_CACHE_CLEANUP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval_ms),
        })
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_default_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.default_ttl_ms = Some(ttl_ms);
        self
    }

    /// Enables the background sweep with the given interval.
    pub fn with_cleanup(mut self, interval_ms: u64) -> Self {
        self.enable_cleanup = true;
        self.cleanup_interval_ms = interval_ms;
        self
    }

    /// Checks option ranges. Called by `ResponseCache::new`.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(StateError::InvalidConfiguration(
                "max_size must be greater than 0".to_string(),
            ));
        }
        if self.enable_cleanup && self.cleanup_interval_ms == 0 {
            return Err(StateError::InvalidConfiguration(
                "cleanup_interval_ms must be greater than 0 when cleanup is enabled".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms)
    }
}

fn parse_ttl(raw: &str) -> Result<u64> {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(ttl) if ttl < 0 => Err(StateError::InvalidConfiguration(format!(
            "API_STATE_CACHE_DEFAULT_TTL_MS must not be negative, got {}",
            ttl
        ))),
        _ => raw.parse().map_err(|_| {
            StateError::InvalidConfiguration(format!(
                "API_STATE_CACHE_DEFAULT_TTL_MS must be a whole number of milliseconds, got '{}'",
                raw
            ))
        }),
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            default_ttl_ms: None,
            enable_cleanup: false,
            cleanup_interval_ms: 60_000,
        }
    }
}
