//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use treevault_entity::file::FileEntry;
use treevault_entity::folder::Folder;
use treevault_service::DeletedSubtree;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Folder summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderResponse {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    /// Logical path; empty for the root.
    pub path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
            parent_id: folder.parent_id,
            path: folder.path,
            created_at: folder.created_at,
            updated_at: folder.updated_at,
        }
    }
}

/// File metadata. Content is served separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    pub id: Uuid,
    pub name: String,
    pub folder_id: Uuid,
    pub file_type: String,
    pub size: i64,
    /// Logical path: folder path plus file name.
    pub path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FileEntry> for FileResponse {
    fn from(entry: FileEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            folder_id: entry.folder_id,
            file_type: entry.file_type,
            size: entry.size,
            path: entry.path,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Summary of a deleted folder subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedFolderResponse {
    pub id: Uuid,
    pub path: String,
    pub folders_deleted: usize,
    pub files_deleted: u64,
}

impl From<DeletedSubtree> for DeletedFolderResponse {
    fn from(deleted: DeletedSubtree) -> Self {
        Self {
            id: deleted.folder.id,
            path: deleted.folder.path,
            folders_deleted: deleted.folder_ids.len(),
            files_deleted: deleted.files_removed,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Database status.
    pub database: String,
    /// Uptime.
    pub uptime_seconds: u64,
}
