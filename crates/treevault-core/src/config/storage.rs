//! Filesystem mirror configuration.

use serde::{Deserialize, Serialize};

/// Settings for the on-disk mirror of the folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory that stands in for the synthetic root folder.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum accepted request body in bytes (default 50 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_root_path() -> String {
    "./public".to_string()
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MB
}
