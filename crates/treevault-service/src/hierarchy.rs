//! Closure-table maintenance for the folder tree.
//!
//! Every folder owns exactly one self-edge at depth 0 plus one edge per
//! ancestor at the tree distance to that ancestor. Edges are written when a
//! folder is created and removed in bulk when its subtree is deleted; nothing
//! else touches them.

use sqlx::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

use treevault_core::error::AppError;
use treevault_core::result::AppResult;
use treevault_database::repositories::HierarchyRepository;
use treevault_entity::folder::Folder;

/// Whether a descendant query includes the starting folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Strict descendants only.
    Strict,
    /// Descendants plus the folder itself.
    IncludeSelf,
}

/// Operations over the ancestor/descendant closure table.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyIndex;

impl HierarchyIndex {
    /// Write the closure edges of a newly inserted folder.
    ///
    /// Must run on the same transaction that inserted the folder row. A
    /// parent without any edges means the catalog is already corrupt.
    pub async fn record_new_folder(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AppResult<()> {
        HierarchyRepository::insert_self_edge(conn, folder_id).await?;

        if let Some(parent_id) = parent_id {
            let copied = HierarchyRepository::copy_ancestors(conn, folder_id, parent_id).await?;
            if copied == 0 {
                return Err(AppError::invariant(format!(
                    "Parent folder {parent_id} has no hierarchy edges"
                )));
            }
            debug!(%folder_id, %parent_id, ancestors = copied, "Recorded folder edges");
        }
        Ok(())
    }

    /// IDs of every folder below `folder_id`, shallowest first.
    pub async fn descendant_ids(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
        scope: Scope,
    ) -> AppResult<Vec<Uuid>> {
        let edges = HierarchyRepository::find_descendant_edges(conn, folder_id).await?;
        Ok(edges
            .into_iter()
            .filter(|edge| scope == Scope::IncludeSelf || !edge.is_self_edge())
            .map(|edge| edge.folder_id)
            .collect())
    }

    /// Distance from the root: 0 for the root itself, 1 for its children.
    pub async fn depth(conn: &mut SqliteConnection, folder_id: Uuid) -> AppResult<i32> {
        HierarchyRepository::max_depth(conn, folder_id)
            .await?
            .ok_or_else(|| {
                AppError::invariant(format!("Folder {folder_id} has no hierarchy edges"))
            })
    }

    /// The subtree rooted at `folder_id` (self included) ordered deepest first.
    ///
    /// Computed once from the subtree's own edges, where `depth` is the
    /// distance below `folder_id`, so no per-folder depth lookup is needed.
    pub async fn deletion_order(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
    ) -> AppResult<Vec<Uuid>> {
        let mut edges = HierarchyRepository::find_descendant_edges(conn, folder_id).await?;
        if edges.is_empty() {
            return Err(AppError::invariant(format!(
                "Folder {folder_id} has no hierarchy edges"
            )));
        }
        edges.sort_by(|a, b| b.depth.cmp(&a.depth));
        Ok(edges.into_iter().map(|edge| edge.folder_id).collect())
    }

    /// Remove every edge naming any of `folder_ids` on either end.
    pub async fn bulk_delete(conn: &mut SqliteConnection, folder_ids: &[Uuid]) -> AppResult<u64> {
        HierarchyRepository::delete_for_folders(conn, folder_ids).await
    }

    /// The folder and its ancestors, root first.
    pub async fn ancestor_chain(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
    ) -> AppResult<Vec<Folder>> {
        let chain = HierarchyRepository::find_ancestors(conn, folder_id).await?;
        if chain.is_empty() {
            return Err(AppError::invariant(format!(
                "Folder {folder_id} has no hierarchy edges"
            )));
        }
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treevault_core::error::ErrorKind;
    use treevault_database::repositories::FolderRepository;
    use treevault_entity::folder::CreateFolder;

    use crate::testing::catalog;

    #[tokio::test]
    async fn test_parent_without_edges_is_invariant_violation() {
        let t = catalog().await;
        let mut conn = t.db.acquire().await.unwrap();

        // A folder row inserted without going through the index.
        let orphan = FolderRepository::create(
            &mut conn,
            &CreateFolder {
                parent_id: Some(t.root.id),
                name: "orphan".into(),
                path: "orphan".into(),
            },
        )
        .await
        .unwrap();
        let child = FolderRepository::create(
            &mut conn,
            &CreateFolder {
                parent_id: Some(orphan.id),
                name: "child".into(),
                path: "orphan/child".into(),
            },
        )
        .await
        .unwrap();

        let err = HierarchyIndex::record_new_folder(&mut conn, child.id, Some(orphan.id))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Invariant);

        let err = HierarchyIndex::depth(&mut conn, orphan.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Invariant);
    }

    #[tokio::test]
    async fn test_root_depth_is_zero() {
        let t = catalog().await;
        let mut conn = t.db.acquire().await.unwrap();
        assert_eq!(HierarchyIndex::depth(&mut conn, t.root.id).await.unwrap(), 0);
        assert_eq!(
            HierarchyIndex::deletion_order(&mut conn, t.root.id)
                .await
                .unwrap(),
            vec![t.root.id]
        );
    }
}
