//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use treevault_core::types::ROOT_FOLDER_NAME;

/// A folder in the virtual hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Folder name, unique among its siblings.
    pub name: String,
    /// Parent folder ID (null only for the root folder).
    pub parent_id: Option<Uuid>,
    /// Cached logical path with the root segment elided (`""` for root).
    pub path: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is the synthetic root folder.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none() && self.name == ROOT_FOLDER_NAME
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Parent folder (None only for the root).
    pub parent_id: Option<Uuid>,
    /// Folder name.
    pub name: String,
    /// Logical path of the new folder.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(name: &str, parent_id: Option<Uuid>) -> Folder {
        let now = Utc::now();
        Folder {
            id: Uuid::new_v4(),
            name: name.to_string(),
            parent_id,
            path: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_is_root() {
        assert!(folder("root", None).is_root());
        assert!(!folder("root", Some(Uuid::new_v4())).is_root());
        assert!(!folder("docs", Some(Uuid::new_v4())).is_root());
    }
}
