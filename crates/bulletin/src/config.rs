use std::{env, time::Duration};

use thiserror::Error;

use crate::storage::cached::CacheSettings;

/// Longest cache TTL accepted from the environment (one year).
const MAX_CACHE_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Errors found while validating a [`Config`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("{name} must be at most {max}")]
    TooLarge { name: &'static str, max: u64 },
    #[error("cache refresh interval ({refresh}s) must be shorter than the cache TTL ({ttl}s)")]
    RefreshNotBeforeExpiry { refresh: u64, ttl: u64 },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Put the event repository behind the caching decorator (default: true)
    pub cache_enabled: bool,
    /// Cache TTL in seconds (default: 600)
    pub cache_ttl_seconds: u64,
    /// Background refresh interval in seconds (default: 580)
    pub cache_refresh_seconds: u64,
    /// Maximum number of cached single-entity lookups (default: 5,000)
    pub cache_max_point_entries: usize,
    /// Maximum number of cached list results (default: 150)
    pub cache_max_list_entries: usize,
    /// Create the demo event and comment at startup (default: true)
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_ttl_seconds: 600,
            cache_refresh_seconds: 580,
            cache_max_point_entries: 5_000,
            cache_max_list_entries: 150,
            seed_demo_data: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_ENABLED` - Enable the event cache (default: true)
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 600)
    /// - `CACHE_REFRESH_SECONDS` - Background refresh interval (default: 580)
    /// - `CACHE_MAX_POINT_ENTRIES` - Single-entity cache size (default: 5,000)
    /// - `CACHE_MAX_LIST_ENTRIES` - List cache size (default: 150)
    /// - `SEED_DEMO_DATA` - Seed the demo event (default: true)
    ///
    /// Unset or unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            cache_enabled: lookup("CACHE_ENABLED")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_enabled),
            cache_ttl_seconds: lookup("CACHE_TTL_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_seconds),
            cache_refresh_seconds: lookup("CACHE_REFRESH_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_refresh_seconds),
            cache_max_point_entries: lookup("CACHE_MAX_POINT_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_max_point_entries),
            cache_max_list_entries: lookup("CACHE_MAX_LIST_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_max_list_entries),
            seed_demo_data: lookup("SEED_DEMO_DATA")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.seed_demo_data),
        }
    }

    /// Checks the cache settings when the cache is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cache_enabled {
            return Ok(());
        }

        if self.cache_ttl_seconds == 0 {
            return Err(ConfigError::Zero("CACHE_TTL_SECONDS"));
        }
        if self.cache_ttl_seconds > MAX_CACHE_TTL_SECONDS {
            return Err(ConfigError::TooLarge {
                name: "CACHE_TTL_SECONDS",
                max: MAX_CACHE_TTL_SECONDS,
            });
        }
        if self.cache_refresh_seconds == 0 {
            return Err(ConfigError::Zero("CACHE_REFRESH_SECONDS"));
        }
        if self.cache_max_point_entries == 0 {
            return Err(ConfigError::Zero("CACHE_MAX_POINT_ENTRIES"));
        }
        if self.cache_max_list_entries == 0 {
            return Err(ConfigError::Zero("CACHE_MAX_LIST_ENTRIES"));
        }
        if self.cache_refresh_seconds >= self.cache_ttl_seconds {
            return Err(ConfigError::RefreshNotBeforeExpiry {
                refresh: self.cache_refresh_seconds,
                ttl: self.cache_ttl_seconds,
            });
        }

        Ok(())
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the background refresh interval as a Duration.
    pub fn cache_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.cache_refresh_seconds)
    }

    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            ttl: self.cache_ttl(),
            max_point_entries: self.cache_max_point_entries,
            max_list_entries: self.cache_max_list_entries,
        }
    }
}
