//! Signed-URL cache configuration.

use serde::{Deserialize, Serialize};

/// Signed-URL cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached URLs.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Lifetime requested for signed URLs, in seconds.
    #[serde(default = "default_url_ttl")]
    pub url_ttl_seconds: u64,
    /// Cache entry lifetime in seconds.
    ///
    /// Must stay below `url_ttl_seconds` so a cache hit never hands out an
    /// already-expired URL.
    #[serde(default = "default_entry_ttl")]
    pub entry_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            url_ttl_seconds: default_url_ttl(),
            entry_ttl_seconds: default_entry_ttl(),
        }
    }
}

fn default_max_capacity() -> u64 {
    10000
}

fn default_url_ttl() -> u64 {
    900
}

fn default_entry_ttl() -> u64 {
    600
}
