//! Cache configuration.
//!
//! Controls the Redis list cache via `misura.toml`.

use serde::Deserialize;

// Default values for cache configuration
const DEFAULT_URL: &str = "redis://127.0.0.1:6379/1";
const DEFAULT_TTL_SECONDS: u64 = 300;
const DEFAULT_SCAN_COUNT: u32 = 100;

/// Cache configuration from `misura.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the Redis list cache.
    pub enabled: bool,
    /// Redis connection URL.
    pub url: String,
    /// Entry lifetime in seconds.
    pub ttl_seconds: u64,
    /// Page size hint for invalidation scans.
    pub scan_count: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_URL.to_string(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
            scan_count: DEFAULT_SCAN_COUNT,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            url: settings.url.clone(),
            ttl_seconds: settings.ttl_seconds.get(),
            scan_count: settings.scan_count.get(),
        }
    }
}
