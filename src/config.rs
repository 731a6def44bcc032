//! Configuration Module
//!
//! Handles loading and validating proxy configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Rejected configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CACHE_MAX_ENTRIES must be greater than zero")]
    ZeroCapacity,

    #[error("NAME_LIST_PAGE_SIZE must be greater than zero")]
    ZeroPageSize,

    #[error("UPSTREAM_BASE_URL must not be empty")]
    EmptyBaseUrl,
}

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Maximum age of a cached response in milliseconds
    pub ttl_ms: u64,
    /// Interval of the optional expired-entry sweep in seconds, 0 disables it
    pub sweep_interval: u64,
    /// Base URL of the upstream API, without trailing slash
    pub upstream_base_url: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
    /// Page size used when walking the name list
    pub name_page_size: usize,
    /// Offset at which the name list walk stops
    pub name_list_max: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 500)
    /// - `CACHE_TTL_MS` - Entry TTL in milliseconds (default: 300000)
    /// - `CACHE_SWEEP_INTERVAL_SECS` - Expired-entry sweep interval (default: 0, off)
    /// - `UPSTREAM_BASE_URL` - Upstream API root (default: https://pokeapi.co/api/v2)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream request timeout (default: 10)
    /// - `NAME_LIST_PAGE_SIZE` - Name list page size (default: 1000)
    /// - `NAME_LIST_MAX` - Name list walk bound (default: 2000)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_entries),
            ttl_ms: env_or("CACHE_TTL_MS", defaults.ttl_ms),
            sweep_interval: env_or("CACHE_SWEEP_INTERVAL_SECS", defaults.sweep_interval),
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout: env_or("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout),
            name_page_size: env_or("NAME_LIST_PAGE_SIZE", defaults.name_page_size),
            name_list_max: env_or("NAME_LIST_MAX", defaults.name_list_max),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Checks the values the rest of the proxy relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.name_page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.upstream_base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 500,
            ttl_ms: 300_000,
            sweep_interval: 0,
            upstream_base_url: "https://pokeapi.co/api/v2".to_string(),
            upstream_timeout: 10,
            name_page_size: 1000,
            name_list_max: 2000,
            server_port: 8080,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
