//! Request DTOs with validation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use treevault_core::error::AppError;
use treevault_core::result::AppResult;

/// Create folder request. Missing intermediate folders are created.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Full logical path of the new folder, e.g. `a/b/c`.
    #[validate(length(min = 1, message = "Folder path is required"))]
    pub path: String,
}

/// Rename folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameFolderRequest {
    /// New folder name.
    #[validate(length(min = 1, max = 255))]
    pub new_name: String,
}

/// Create file request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFileRequest {
    /// Folder path. Empty for the root.
    #[serde(default)]
    pub folder_path: String,
    /// File name without the type suffix.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Registered file type.
    #[validate(length(min = 1, message = "File type is required"))]
    pub file_type: String,
    /// Declared size. Defaults to the decoded content length.
    #[validate(range(min = 0))]
    pub size: Option<i64>,
    /// Base64-encoded content.
    #[serde(default)]
    pub content: String,
}

/// Partial file update. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateFileRequest {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// New containing folder.
    pub folder_id: Option<Uuid>,
    /// New file type.
    #[validate(length(min = 1))]
    pub file_type: Option<String>,
    /// New declared size.
    #[validate(range(min = 0))]
    pub size: Option<i64>,
    /// New base64-encoded content.
    pub content: Option<String>,
}

/// Delete a file by `<folder path>/<name>` and type.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteFileByPathRequest {
    /// Folder path plus file name.
    #[validate(length(min = 1, message = "File path is required"))]
    pub full_path: String,
    /// Registered file type.
    #[validate(length(min = 1, message = "File type is required"))]
    pub file_type: String,
}

/// Register a file type.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFileTypeRequest {
    /// Type name, e.g. `pdf`.
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 32))]
    pub type_name: String,
}

/// `?path=` query for folder lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderPathQuery {
    /// Logical folder path. Empty for the root.
    #[serde(default)]
    pub path: String,
}

/// `?folder_path=&file_type=` query for file search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSearchQuery {
    /// Logical folder path. Empty for the root.
    #[serde(default)]
    pub folder_path: String,
    /// Optional type filter.
    pub file_type: Option<String>,
}

/// Decode base64 file content from a request body.
pub fn decode_content(encoded: &str) -> AppResult<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::validation(format!("Content is not valid base64: {e}")))
}
