//! Catalog seeding configuration.

use serde::{Deserialize, Serialize};

/// Settings for data seeded into the catalog at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// File types registered at startup if missing.
    #[serde(default = "default_file_types")]
    pub default_file_types: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_file_types: default_file_types(),
        }
    }
}

fn default_file_types() -> Vec<String> {
    ["pdf", "png", "txt", "docx", "jpg"]
        .into_iter()
        .map(String::from)
        .collect()
}
