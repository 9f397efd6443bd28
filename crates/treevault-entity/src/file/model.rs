//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file's catalog row, joined with its resolved type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FileEntry {
    /// Unique file identifier.
    pub id: Uuid,
    /// File name without the type suffix.
    pub name: String,
    /// The folder containing this file.
    pub folder_id: Uuid,
    /// The file type row.
    pub file_type_id: Uuid,
    /// The file type name (e.g. `txt`), joined from `file_types`.
    pub file_type: String,
    /// Declared size in bytes.
    pub size: i64,
    /// Raw file content.
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,
    /// Cached logical path: the folder's path plus the file name.
    pub path: String,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FileEntry {
    /// The `<name>.<type>` file name used on disk.
    pub fn disk_name(&self) -> String {
        format!("{}.{}", self.name, self.file_type)
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// The folder to place the file in.
    pub folder_id: Uuid,
    /// The file type row.
    pub file_type_id: Uuid,
    /// Declared size in bytes.
    pub size: i64,
    /// Raw content.
    pub data: Vec<u8>,
}

/// A partial update to a file. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileChanges {
    /// New file name.
    pub name: Option<String>,
    /// New containing folder.
    pub folder_id: Option<Uuid>,
    /// New file type.
    pub file_type_id: Option<Uuid>,
    /// New content.
    pub data: Option<Vec<u8>>,
    /// New declared size. Defaults to the new content length when content
    /// changes without an explicit size.
    pub size: Option<i64>,
}

impl FileChanges {
    /// Whether the change moves the file to a different `(folder, name, type)`
    /// identity relative to `current`.
    pub fn changes_identity(&self, current: &FileEntry) -> bool {
        self.name.as_ref().is_some_and(|n| *n != current.name)
            || self.folder_id.is_some_and(|f| f != current.folder_id)
            || self.file_type_id.is_some_and(|t| t != current.file_type_id)
    }
}
