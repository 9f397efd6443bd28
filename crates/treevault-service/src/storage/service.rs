//! Catalog-first orchestration of the folder tree, file catalog and mirror.
//!
//! Every mutating use case runs as one catalog transaction. The matching
//! mirror operation runs only after that transaction commits; if it fails the
//! catalog change stays in place and a [`ErrorKind::Storage`] error naming the
//! committed operation is returned.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use treevault_core::error::{AppError, ErrorKind};
use treevault_core::result::AppResult;
use treevault_core::traits::mirror::{FileLocation, MirrorStore};
use treevault_core::types::PathCodec;
use treevault_database::DatabasePool;
use treevault_database::connection::commit;
use treevault_entity::file::{FileChanges, FileEntry};
use treevault_entity::folder::Folder;

use crate::file::{FileCatalog, NewFile};
use crate::file_type::FileTypeRegistry;
use crate::folder::{DeletedSubtree, FolderTree};

/// Request to create a file at a logical folder path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileRequest {
    /// Folder path; missing folders are created.
    pub folder_path: String,
    /// File name without the type suffix.
    pub name: String,
    /// Registered file type name.
    pub file_type: String,
    /// Declared size. Defaults to the content length.
    pub size: Option<i64>,
    /// Raw content.
    pub data: Vec<u8>,
}

/// Partial update of a file. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFileRequest {
    /// New name.
    pub name: Option<String>,
    /// New containing folder.
    pub folder_id: Option<Uuid>,
    /// New registered type name.
    pub file_type: Option<String>,
    /// New declared size.
    pub size: Option<i64>,
    /// New content.
    pub data: Option<Vec<u8>>,
}

/// Sequences catalog transactions with the filesystem mirror.
#[derive(Debug, Clone)]
pub struct StorageService {
    /// Catalog database.
    db: DatabasePool,
    /// Filesystem mirror.
    mirror: Arc<dyn MirrorStore>,
}

impl StorageService {
    /// Creates a new storage service.
    pub fn new(db: DatabasePool, mirror: Arc<dyn MirrorStore>) -> Self {
        Self { db, mirror }
    }

    // ── Files ──────────────────────────────────────────────────────

    /// Creates a file, creating its folder chain as needed, then writes its
    /// bytes to the mirror.
    pub async fn create_file(&self, req: CreateFileRequest) -> AppResult<FileEntry> {
        let mut tx = self.db.begin().await?;

        let folder =
            FolderTree::resolve_or_create_path(&mut tx, &PathCodec::split(&req.folder_path))
                .await?;
        let file_type = FileTypeRegistry::resolve(&mut tx, &req.file_type).await?;
        let entry = FileCatalog::create(
            &mut tx,
            NewFile {
                name: &req.name,
                folder: &folder,
                file_type: &file_type,
                size: req.size,
                data: req.data,
            },
        )
        .await?;
        let location = self.location_of(&mut tx, &entry).await?;

        commit(tx).await?;
        info!(file_id = %entry.id, path = %entry.path, file_type = %entry.file_type, "File created");

        self.mirror
            .create_file(&location, Bytes::from(entry.data.clone()))
            .await
            .map_err(|e| mirror_failure("create file", &entry.path, e))?;
        Ok(entry)
    }

    /// Applies a partial update, then moves and/or rewrites the mirrored file.
    pub async fn update_file(&self, file_id: Uuid, req: UpdateFileRequest) -> AppResult<FileEntry> {
        let mut tx = self.db.begin().await?;

        let file_type_id = match req.file_type.as_deref() {
            Some(raw) => Some(FileTypeRegistry::resolve(&mut tx, raw).await?.id),
            None => None,
        };
        let changes = FileChanges {
            name: req.name,
            folder_id: req.folder_id,
            file_type_id,
            data: req.data,
            size: req.size,
        };
        let updated = FileCatalog::update(&mut tx, file_id, changes).await?;
        let old_location = self.location_of(&mut tx, &updated.before).await?;
        let new_location = self.location_of(&mut tx, &updated.after).await?;

        commit(tx).await?;
        info!(
            %file_id,
            from = %updated.before.path,
            to = %updated.after.path,
            "File updated"
        );

        if updated.moved() || updated.content_changed() {
            self.mirror
                .move_file(
                    &old_location,
                    &new_location,
                    Bytes::from(updated.after.data.clone()),
                )
                .await
                .map_err(|e| mirror_failure("update file", &updated.after.path, e))?;
        }
        Ok(updated.after)
    }

    /// Deletes a file row, then its mirrored copy.
    pub async fn delete_file(&self, file_id: Uuid) -> AppResult<FileEntry> {
        let mut tx = self.db.begin().await?;
        let location = {
            let entry = FileCatalog::find(&mut tx, file_id).await?;
            self.location_of(&mut tx, &entry).await?
        };
        let entry = FileCatalog::delete(&mut tx, file_id).await?;
        commit(tx).await?;
        info!(%file_id, path = %entry.path, "File deleted");

        self.mirror
            .delete_file(&location)
            .await
            .map_err(|e| mirror_failure("delete file", &entry.path, e))?;
        Ok(entry)
    }

    /// Deletes a file addressed by `<folder path>/<name>` and type. The folder
    /// must already exist.
    pub async fn delete_file_by_path(&self, full_path: &str, file_type: &str) -> AppResult<FileEntry> {
        let segments = PathCodec::split(full_path);
        let Some((name, folder_segments)) = segments.split_last() else {
            return Err(AppError::validation("File path cannot be empty"));
        };

        let mut tx = self.db.begin().await?;
        let folder = FolderTree::resolve_existing_path(&mut tx, folder_segments).await?;
        let file_type = FileTypeRegistry::resolve(&mut tx, file_type).await?;
        let entry = FileCatalog::find_by_identity(&mut tx, &folder, name, &file_type).await?;
        let location = self.location_of(&mut tx, &entry).await?;
        FileCatalog::delete(&mut tx, entry.id).await?;
        commit(tx).await?;
        info!(file_id = %entry.id, path = %entry.path, "File deleted by path");

        self.mirror
            .delete_file(&location)
            .await
            .map_err(|e| mirror_failure("delete file", &entry.path, e))?;
        Ok(entry)
    }

    /// Gets a file by ID.
    pub async fn get_file(&self, file_id: Uuid) -> AppResult<FileEntry> {
        let mut conn = self.db.acquire().await?;
        FileCatalog::find(&mut conn, file_id).await
    }

    /// Reads a file's content from the catalog.
    pub async fn file_content(&self, file_id: Uuid) -> AppResult<(FileEntry, Bytes)> {
        let mut entry = self.get_file(file_id).await?;
        let data = Bytes::from(std::mem::take(&mut entry.data));
        Ok((entry, data))
    }

    /// Lists all files.
    pub async fn list_files(&self) -> AppResult<Vec<FileEntry>> {
        let mut conn = self.db.acquire().await?;
        FileCatalog::list_all(&mut conn).await
    }

    /// Lists the files directly inside a folder.
    pub async fn files_in_folder(&self, folder_id: Uuid) -> AppResult<Vec<FileEntry>> {
        let mut conn = self.db.acquire().await?;
        FileCatalog::find_by_folder(&mut conn, folder_id).await
    }

    /// Lists files of one type.
    pub async fn files_by_type(&self, file_type: &str) -> AppResult<Vec<FileEntry>> {
        let mut conn = self.db.acquire().await?;
        FileCatalog::find_by_type(&mut conn, file_type).await
    }

    /// Files directly under a logical folder path, optionally of one type.
    pub async fn search_files(
        &self,
        folder_path: &str,
        file_type: Option<&str>,
    ) -> AppResult<Vec<FileEntry>> {
        let mut conn = self.db.acquire().await?;
        FileCatalog::find_by_folder_prefix(&mut conn, folder_path, file_type).await
    }

    // ── Folders ────────────────────────────────────────────────────

    /// Creates a folder at a logical path, then its mirror directory.
    pub async fn create_folder(&self, path: &str) -> AppResult<Folder> {
        let segments = PathCodec::split(path);

        let mut tx = self.db.begin().await?;
        let folder = FolderTree::create_folder(&mut tx, &segments).await?;
        commit(tx).await?;
        info!(folder_id = %folder.id, path = %folder.path, "Folder created");

        self.mirror
            .create_dir(&segments)
            .await
            .map_err(|e| mirror_failure("create folder", &folder.path, e))?;
        Ok(folder)
    }

    /// Renames a folder, then moves its mirror directory.
    pub async fn rename_folder(&self, folder_id: Uuid, new_name: &str) -> AppResult<Folder> {
        let mut tx = self.db.begin().await?;
        FolderTree::find(&mut tx, folder_id).await?;
        let old_segments = FolderTree::folder_segments(&mut tx, folder_id).await?;
        let renamed = FolderTree::rename(&mut tx, folder_id, new_name.trim()).await?;
        if !renamed.changed() {
            return Ok(renamed.after);
        }
        let new_segments = FolderTree::folder_segments(&mut tx, folder_id).await?;
        commit(tx).await?;
        info!(
            %folder_id,
            from = %renamed.before.path,
            to = %renamed.after.path,
            "Folder renamed"
        );

        self.mirror
            .rename_dir(&old_segments, &new_segments)
            .await
            .map_err(|e| mirror_failure("rename folder", &renamed.after.path, e))?;
        Ok(renamed.after)
    }

    /// Deletes a folder subtree with all its files, then its mirror directory.
    pub async fn delete_folder(&self, folder_id: Uuid) -> AppResult<DeletedSubtree> {
        let mut tx = self.db.begin().await?;
        FolderTree::find(&mut tx, folder_id).await?;
        let segments = FolderTree::folder_segments(&mut tx, folder_id).await?;
        let deleted = FolderTree::delete_subtree(&mut tx, folder_id).await?;
        commit(tx).await?;
        info!(
            %folder_id,
            path = %deleted.folder.path,
            folders = deleted.folder_ids.len(),
            files = deleted.files_removed,
            "Folder deleted"
        );

        self.mirror
            .delete_dir_recursive(&segments)
            .await
            .map_err(|e| mirror_failure("delete folder", &deleted.folder.path, e))?;
        Ok(deleted)
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: Uuid) -> AppResult<Folder> {
        let mut conn = self.db.acquire().await?;
        FolderTree::find(&mut conn, folder_id).await
    }

    /// Gets an existing folder by logical path. The empty path is the root.
    pub async fn folder_by_path(&self, path: &str) -> AppResult<Folder> {
        let mut conn = self.db.acquire().await?;
        FolderTree::resolve_existing_path(&mut conn, &PathCodec::split(path)).await
    }

    /// Lists all folders.
    pub async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        let mut conn = self.db.acquire().await?;
        FolderTree::list_all(&mut conn).await
    }

    /// Lists the direct children of a folder.
    pub async fn folder_children(&self, folder_id: Uuid) -> AppResult<Vec<Folder>> {
        let mut conn = self.db.acquire().await?;
        FolderTree::children(&mut conn, folder_id).await
    }

    async fn location_of(
        &self,
        conn: &mut sqlx::SqliteConnection,
        entry: &FileEntry,
    ) -> AppResult<FileLocation> {
        let folder = FolderTree::folder_segments(conn, entry.folder_id).await?;
        Ok(FileLocation::new(folder, &entry.name, &entry.file_type))
    }
}

/// Log a post-commit mirror failure and wrap it as a storage error.
fn mirror_failure(operation: &'static str, path: &str, err: AppError) -> AppError {
    error!(
        operation,
        path,
        error = %err,
        "Mirror update failed after the catalog change was committed"
    );
    AppError::with_source(
        ErrorKind::Storage,
        format!(
            "Failed to {operation} on disk for '{path}'; the catalog change was committed"
        ),
        err,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use treevault_storage::LocalDiskMirror;

    use crate::testing::{TestCatalog, catalog, file_type};

    async fn service() -> (StorageService, TestCatalog) {
        let t = catalog().await;
        file_type(&t.db, "txt").await;
        let mirror = LocalDiskMirror::new(t.dir.path().join("public"))
            .await
            .unwrap();
        (StorageService::new(t.db.clone(), Arc::new(mirror)), t)
    }

    fn request(folder_path: &str, name: &str) -> CreateFileRequest {
        CreateFileRequest {
            folder_path: folder_path.to_string(),
            name: name.to_string(),
            file_type: "txt".to_string(),
            size: None,
            data: b"content".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_update_rewrites_mirror_on_rename() {
        let (service, t) = service().await;
        let public = t.dir.path().join("public");

        let entry = service.create_file(request("a", "doc")).await.unwrap();
        assert!(public.join("a/doc.txt").exists());

        let updated = service
            .update_file(
                entry.id,
                UpdateFileRequest {
                    name: Some("memo".into()),
                    data: Some(b"v2".to_vec()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.path, "a/memo");
        assert_eq!(updated.size, 2);
        assert!(!public.join("a/doc.txt").exists());
        assert_eq!(std::fs::read(public.join("a/memo.txt")).unwrap(), b"v2");
    }

    #[tokio::test]
    async fn test_rename_same_name_skips_mirror() {
        let (service, t) = service().await;
        let folder = service.create_folder("a").await.unwrap();
        std::fs::remove_dir(t.dir.path().join("public/a")).unwrap();

        let same = service.rename_folder(folder.id, "a").await.unwrap();
        assert_eq!(same.id, folder.id);
        assert!(!t.dir.path().join("public/a").exists());
    }

    #[tokio::test]
    async fn test_delete_by_path() {
        let (service, t) = service().await;
        service.create_file(request("a/b", "doc")).await.unwrap();

        let err = service
            .delete_file_by_path("missing/doc", "txt")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let deleted = service.delete_file_by_path("/a/b/doc", "TXT").await.unwrap();
        assert_eq!(deleted.path, "a/b/doc");
        assert!(!t.dir.path().join("public/a/b/doc.txt").exists());
        assert!(service.list_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_content_comes_from_catalog() {
        let (service, t) = service().await;
        let entry = service.create_file(request("", "top")).await.unwrap();
        std::fs::remove_file(t.dir.path().join("public/top.txt")).unwrap();

        let (meta, data) = service.file_content(entry.id).await.unwrap();
        assert_eq!(meta.path, "top");
        assert_eq!(&data[..], b"content");
    }
}
