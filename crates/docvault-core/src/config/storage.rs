//! Object store configuration.

use serde::{Deserialize, Serialize};

/// Top-level object store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Object store provider to use: `"memory"` or `"local"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Maximum number of items returned per `list` page.
    ///
    /// Callers page until exhausted; very large folders therefore cost many
    /// round trips, a known latency limitation of prefix renames.
    #[serde(default = "default_list_page_size")]
    pub list_page_size: usize,
    /// Local filesystem provider configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
}

/// Local filesystem object store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root directory holding all objects.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            list_page_size: default_list_page_size(),
            local: LocalStorageConfig::default(),
        }
    }
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_list_page_size() -> usize {
    1000
}

fn default_local_root() -> String {
    "./data/objects".to_string()
}
