//! Folder tree: path resolution, creation, rename and subtree deletion.

use sqlx::SqliteConnection;
use tracing::{debug, info};
use uuid::Uuid;

use treevault_core::error::AppError;
use treevault_core::result::AppResult;
use treevault_core::types::{PathCodec, ROOT_FOLDER_NAME};
use treevault_database::repositories::{FileRepository, FolderRepository};
use treevault_entity::folder::{CreateFolder, Folder};

use crate::hierarchy::{HierarchyIndex, Scope};

/// Result of a folder rename.
#[derive(Debug, Clone)]
pub struct RenamedFolder {
    /// The folder as it was before the rename.
    pub before: Folder,
    /// The folder after the rename.
    pub after: Folder,
}

impl RenamedFolder {
    /// Whether the rename changed anything.
    pub fn changed(&self) -> bool {
        self.before.name != self.after.name
    }
}

/// Result of deleting a folder subtree.
#[derive(Debug, Clone)]
pub struct DeletedSubtree {
    /// The top folder of the deleted subtree.
    pub folder: Folder,
    /// Every deleted folder ID, deepest first.
    pub folder_ids: Vec<Uuid>,
    /// Number of file rows removed with the subtree.
    pub files_removed: u64,
}

/// Folder tree operations. Every call runs on the caller's connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderTree;

impl FolderTree {
    /// Return the root folder, creating it with its self-edge if absent.
    pub async fn ensure_root(conn: &mut SqliteConnection) -> AppResult<Folder> {
        if let Some(root) = FolderRepository::find_root(conn).await? {
            return Ok(root);
        }

        let root = FolderRepository::create(
            conn,
            &CreateFolder {
                parent_id: None,
                name: ROOT_FOLDER_NAME.to_string(),
                path: String::new(),
            },
        )
        .await?;
        HierarchyIndex::record_new_folder(conn, root.id, None).await?;

        info!(folder_id = %root.id, "Created root folder");
        Ok(root)
    }

    /// Look up the root folder. Its absence is an invariant violation.
    pub async fn root(conn: &mut SqliteConnection) -> AppResult<Folder> {
        FolderRepository::find_root(conn)
            .await?
            .ok_or_else(|| AppError::invariant("Root folder is missing"))
    }

    /// Get a folder by ID.
    pub async fn find(conn: &mut SqliteConnection, folder_id: Uuid) -> AppResult<Folder> {
        FolderRepository::find_by_id(conn, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Walk `segments` from the root, creating every missing folder.
    ///
    /// Idempotent: existing folders are reused at every level. An empty
    /// sequence returns the root.
    pub async fn resolve_or_create_path(
        conn: &mut SqliteConnection,
        segments: &[String],
    ) -> AppResult<Folder> {
        for segment in segments {
            PathCodec::validate_segment(segment)?;
        }

        let mut current = Self::root(conn).await?;
        for segment in segments {
            current = match FolderRepository::find_child(conn, current.id, segment).await? {
                Some(existing) => existing,
                None => Self::create_child(conn, &current, segment).await?,
            };
        }
        Ok(current)
    }

    /// Walk `segments` from the root, failing at the first missing folder.
    pub async fn resolve_existing_path(
        conn: &mut SqliteConnection,
        segments: &[String],
    ) -> AppResult<Folder> {
        let mut current = Self::root(conn).await?;
        for (index, segment) in segments.iter().enumerate() {
            current = FolderRepository::find_child(conn, current.id, segment)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "Folder '{}' not found",
                        PathCodec::join(&segments[..=index])
                    ))
                })?;
        }
        Ok(current)
    }

    /// Create a folder at `segments`, creating missing intermediate folders.
    ///
    /// Fails with Conflict only when the leaf already exists.
    pub async fn create_folder(
        conn: &mut SqliteConnection,
        segments: &[String],
    ) -> AppResult<Folder> {
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(AppError::validation("Folder path cannot be empty"));
        };
        PathCodec::validate_segment(leaf)?;

        let parent = Self::resolve_or_create_path(conn, parents).await?;
        if FolderRepository::find_child(conn, parent.id, leaf)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Folder '{}' already exists",
                PathCodec::join(segments)
            )));
        }
        Self::create_child(conn, &parent, leaf).await
    }

    /// Insert one folder below `parent` together with its closure edges.
    pub async fn create_child(
        conn: &mut SqliteConnection,
        parent: &Folder,
        name: &str,
    ) -> AppResult<Folder> {
        PathCodec::validate_segment(name)?;

        let folder = FolderRepository::create(
            conn,
            &CreateFolder {
                parent_id: Some(parent.id),
                name: name.to_string(),
                path: PathCodec::child(&parent.path, name),
            },
        )
        .await?;
        HierarchyIndex::record_new_folder(conn, folder.id, Some(parent.id)).await?;

        debug!(folder_id = %folder.id, path = %folder.path, "Created folder");
        Ok(folder)
    }

    /// Rename a folder and recompute the cached path of every folder and file
    /// in its subtree.
    pub async fn rename(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
        new_name: &str,
    ) -> AppResult<RenamedFolder> {
        let before = Self::find(conn, folder_id).await?;
        if before.is_root() {
            return Err(AppError::validation("The root folder cannot be renamed"));
        }
        PathCodec::validate_segment(new_name)?;

        if before.name == new_name {
            return Ok(RenamedFolder {
                after: before.clone(),
                before,
            });
        }

        let parent_id = before
            .parent_id
            .ok_or_else(|| AppError::invariant(format!("Folder {folder_id} has no parent")))?;
        if FolderRepository::find_child(conn, parent_id, new_name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Folder '{new_name}' already exists in the parent folder"
            )));
        }

        FolderRepository::rename(conn, folder_id, new_name).await?;

        let subtree = HierarchyIndex::descendant_ids(conn, folder_id, Scope::IncludeSelf).await?;
        for id in &subtree {
            let path = Self::folder_logical_path(conn, *id).await?;
            FolderRepository::update_path(conn, *id, &path).await?;
            FileRepository::update_paths_in_folder(conn, *id, &path).await?;
        }

        let after = Self::find(conn, folder_id).await?;
        debug!(
            %folder_id,
            from = %before.path,
            to = %after.path,
            folders = subtree.len(),
            "Recomputed subtree paths"
        );
        Ok(RenamedFolder { before, after })
    }

    /// Delete a folder, every descendant folder, their files and all closure
    /// edges that reference any of them.
    pub async fn delete_subtree(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
    ) -> AppResult<DeletedSubtree> {
        let folder = Self::find(conn, folder_id).await?;
        if folder.is_root() {
            return Err(AppError::validation("The root folder cannot be deleted"));
        }

        let order = HierarchyIndex::deletion_order(conn, folder_id).await?;
        let files_removed = FileRepository::delete_by_folders(conn, &order).await?;
        HierarchyIndex::bulk_delete(conn, &order).await?;
        for id in &order {
            FolderRepository::delete(conn, *id).await?;
        }

        Ok(DeletedSubtree {
            folder,
            folder_ids: order,
            files_removed,
        })
    }

    /// The folder's logical path, built from its ancestor chain with the root
    /// segment stripped.
    pub async fn folder_logical_path(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
    ) -> AppResult<String> {
        Ok(PathCodec::join(&Self::folder_segments(conn, folder_id).await?))
    }

    /// The folder's path segments below the root.
    pub async fn folder_segments(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
    ) -> AppResult<Vec<String>> {
        let chain = HierarchyIndex::ancestor_chain(conn, folder_id).await?;
        Ok(chain
            .into_iter()
            .filter(|folder| !folder.is_root())
            .map(|folder| folder.name)
            .collect())
    }

    pub async fn list_all(conn: &mut SqliteConnection) -> AppResult<Vec<Folder>> {
        FolderRepository::find_all(conn).await
    }

    /// Direct children of a folder.
    pub async fn children(conn: &mut SqliteConnection, folder_id: Uuid) -> AppResult<Vec<Folder>> {
        Self::find(conn, folder_id).await?;
        FolderRepository::find_children(conn, folder_id).await
    }
}
