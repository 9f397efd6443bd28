//! File type entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered file type such as `pdf` or `txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FileType {
    /// Unique file type identifier.
    pub id: Uuid,
    /// Lower-case type name, unique across the registry.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub type_name: String,
}

impl FileType {
    /// Normalise user input into a registry key.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(FileType::normalize("  PDF "), "pdf");
    }
}
