//! File metadata catalog.

use sqlx::SqliteConnection;
use uuid::Uuid;

use treevault_core::error::AppError;
use treevault_core::result::AppResult;
use treevault_core::types::PathCodec;
use treevault_database::repositories::FileRepository;
use treevault_entity::file::{CreateFile, FileChanges, FileEntry};
use treevault_entity::file_type::FileType;
use treevault_entity::folder::Folder;

use crate::file_type::FileTypeRegistry;
use crate::folder::FolderTree;

/// A file about to be inserted into the catalog.
#[derive(Debug, Clone)]
pub struct NewFile<'a> {
    /// File name without the type suffix.
    pub name: &'a str,
    /// Containing folder.
    pub folder: &'a Folder,
    /// Resolved file type.
    pub file_type: &'a FileType,
    /// Declared size. Defaults to the content length.
    pub size: Option<i64>,
    /// Raw content.
    pub data: Vec<u8>,
}

/// Result of a file update.
#[derive(Debug, Clone)]
pub struct UpdatedFile {
    /// The row before the update.
    pub before: FileEntry,
    /// The row after the update.
    pub after: FileEntry,
}

impl UpdatedFile {
    /// Whether the `(folder, name, type)` identity changed.
    pub fn moved(&self) -> bool {
        self.before.folder_id != self.after.folder_id
            || self.before.name != self.after.name
            || self.before.file_type_id != self.after.file_type_id
    }

    /// Whether the stored content changed.
    pub fn content_changed(&self) -> bool {
        self.before.data != self.after.data
    }
}

/// File row operations. Every call runs on the caller's connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCatalog;

impl FileCatalog {
    /// Insert a file. Fails with Conflict if `(folder, name, type)` is taken.
    pub async fn create(conn: &mut SqliteConnection, file: NewFile<'_>) -> AppResult<FileEntry> {
        PathCodec::validate_segment(file.name)?;
        if let Some(size) = file.size {
            if size < 0 {
                return Err(AppError::validation("File size cannot be negative"));
            }
        }

        if FileRepository::exists_identity(conn, file.folder.id, file.name, file.file_type.id, None)
            .await?
        {
            return Err(AppError::conflict(format!(
                "File '{}' of type '{}' already exists",
                PathCodec::child(&file.folder.path, file.name),
                file.file_type.type_name
            )));
        }

        let folder_path = FolderTree::folder_logical_path(conn, file.folder.id).await?;
        let path = PathCodec::child(&folder_path, file.name);
        let size = file.size.unwrap_or(file.data.len() as i64);

        FileRepository::create(
            conn,
            &CreateFile {
                name: file.name.to_string(),
                folder_id: file.folder.id,
                file_type_id: file.file_type.id,
                size,
                data: file.data,
            },
            &path,
        )
        .await
    }

    /// Apply a partial update. Identity changes are re-validated against
    /// every other file and recompute the cached path.
    pub async fn update(
        conn: &mut SqliteConnection,
        file_id: Uuid,
        changes: FileChanges,
    ) -> AppResult<UpdatedFile> {
        let before = Self::find(conn, file_id).await?;
        let moved = changes.changes_identity(&before);
        let mut next = before.clone();

        if let Some(name) = changes.name {
            PathCodec::validate_segment(&name)?;
            next.name = name;
        }
        if let Some(folder_id) = changes.folder_id {
            FolderTree::find(conn, folder_id).await?;
            next.folder_id = folder_id;
        }
        if let Some(file_type_id) = changes.file_type_id {
            next.file_type = FileTypeRegistry::get(conn, file_type_id).await?.type_name;
            next.file_type_id = file_type_id;
        }
        if let Some(data) = changes.data {
            next.size = data.len() as i64;
            next.data = data;
        }
        if let Some(size) = changes.size {
            if size < 0 {
                return Err(AppError::validation("File size cannot be negative"));
            }
            next.size = size;
        }

        if moved {
            if FileRepository::exists_identity(
                conn,
                next.folder_id,
                &next.name,
                next.file_type_id,
                Some(next.id),
            )
            .await?
            {
                return Err(AppError::conflict(format!(
                    "File '{}' of type '{}' already exists in the target folder",
                    next.name, next.file_type
                )));
            }
            let folder_path = FolderTree::folder_logical_path(conn, next.folder_id).await?;
            next.path = PathCodec::child(&folder_path, &next.name);
        }

        let after = FileRepository::update(conn, &next).await?;
        Ok(UpdatedFile { before, after })
    }

    /// Get a file by ID.
    pub async fn find(conn: &mut SqliteConnection, file_id: Uuid) -> AppResult<FileEntry> {
        FileRepository::find_by_id(conn, file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    pub async fn list_all(conn: &mut SqliteConnection) -> AppResult<Vec<FileEntry>> {
        FileRepository::find_all(conn).await
    }

    /// Files directly inside a folder.
    pub async fn find_by_folder(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
    ) -> AppResult<Vec<FileEntry>> {
        FolderTree::find(conn, folder_id).await?;
        FileRepository::find_by_folder(conn, folder_id).await
    }

    /// Files of a registered type.
    pub async fn find_by_type(
        conn: &mut SqliteConnection,
        type_name: &str,
    ) -> AppResult<Vec<FileEntry>> {
        let file_type = FileTypeRegistry::resolve(conn, type_name).await?;
        FileRepository::find_by_type(conn, &file_type.type_name).await
    }

    /// Files directly under a logical folder path, optionally of one type.
    pub async fn find_by_folder_prefix(
        conn: &mut SqliteConnection,
        folder_path: &str,
        type_name: Option<&str>,
    ) -> AppResult<Vec<FileEntry>> {
        let folder_path = PathCodec::join(&PathCodec::split(folder_path));
        let type_name = type_name
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(FileType::normalize);
        FileRepository::find_by_folder_prefix(conn, &folder_path, type_name.as_deref()).await
    }

    /// Find a file by folder, name and type.
    pub async fn find_by_identity(
        conn: &mut SqliteConnection,
        folder: &Folder,
        name: &str,
        file_type: &FileType,
    ) -> AppResult<FileEntry> {
        FileRepository::find_by_identity(conn, folder.id, name, file_type.id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "File '{}' of type '{}' not found",
                    PathCodec::child(&folder.path, name),
                    file_type.type_name
                ))
            })
    }

    /// Remove a file row and return it. The mirror is not touched.
    pub async fn delete(conn: &mut SqliteConnection, file_id: Uuid) -> AppResult<FileEntry> {
        let entry = Self::find(conn, file_id).await?;
        FileRepository::delete(conn, file_id).await?;
        Ok(entry)
    }
}
