//! Upload configuration.

use serde::{Deserialize, Serialize};

/// Upload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum number of files accepted in one batch upload.
    ///
    /// The batch fans out one concurrent task per file, so this bound is
    /// also the fan-out limit.
    #[serde(default = "default_max_files_per_batch")]
    pub max_files_per_batch: usize,
    /// Maximum size of a single uploaded file in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_files_per_batch: default_max_files_per_batch(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_max_files_per_batch() -> usize {
    10
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}
