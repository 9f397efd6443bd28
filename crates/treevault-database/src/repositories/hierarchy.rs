//! Closure-table repository for `folder_hierarchy`.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use uuid::Uuid;

use treevault_core::error::{AppError, ErrorKind};
use treevault_core::result::AppResult;
use treevault_entity::folder::{Folder, HierarchyEdge};

use super::push_id_list;

/// Row-level queries against the closure table.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyRepository;

impl HierarchyRepository {
    /// Insert the `(folder, folder, 0)` self-edge.
    pub async fn insert_self_edge(conn: &mut SqliteConnection, folder_id: Uuid) -> AppResult<()> {
        sqlx::query("INSERT INTO folder_hierarchy (folder_id, ancestor_id, depth) VALUES (?, ?, 0)")
            .bind(folder_id)
            .bind(folder_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert self edge", e)
            })?;
        Ok(())
    }

    /// Copy every edge of `parent_id` onto `folder_id` at `depth + 1`.
    ///
    /// Returns the number of edges written; zero means the parent has no
    /// closure rows at all.
    pub async fn copy_ancestors(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
        parent_id: Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "INSERT INTO folder_hierarchy (folder_id, ancestor_id, depth) \
             SELECT ?, ancestor_id, depth + 1 FROM folder_hierarchy WHERE folder_id = ?",
        )
        .bind(folder_id)
        .bind(parent_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to copy ancestor edges", e))?;
        Ok(result.rows_affected())
    }

    /// Every edge whose descendant end is `folder_id`.
    pub async fn find_by_folder(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
    ) -> AppResult<Vec<HierarchyEdge>> {
        sqlx::query_as::<_, HierarchyEdge>(
            "SELECT * FROM folder_hierarchy WHERE folder_id = ? ORDER BY depth ASC",
        )
        .bind(folder_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load folder edges", e))
    }

    /// Every edge whose ancestor end is `ancestor_id`, shallowest first.
    ///
    /// `depth` on each row is the distance below `ancestor_id`.
    pub async fn find_descendant_edges(
        conn: &mut SqliteConnection,
        ancestor_id: Uuid,
    ) -> AppResult<Vec<HierarchyEdge>> {
        sqlx::query_as::<_, HierarchyEdge>(
            "SELECT * FROM folder_hierarchy WHERE ancestor_id = ? ORDER BY depth ASC",
        )
        .bind(ancestor_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load descendant edges", e)
        })
    }

    /// The largest depth in a folder's own edge set, or `None` if it has no edges.
    pub async fn max_depth(conn: &mut SqliteConnection, folder_id: Uuid) -> AppResult<Option<i32>> {
        sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(depth) FROM folder_hierarchy WHERE folder_id = ?",
        )
        .bind(folder_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to compute folder depth", e))
    }

    /// Ancestors of a folder, self included, ordered root first.
    pub async fn find_ancestors(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT f.* FROM folder_hierarchy h \
             JOIN folders f ON f.id = h.ancestor_id \
             WHERE h.folder_id = ? ORDER BY h.depth DESC",
        )
        .bind(folder_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load ancestors", e))
    }

    /// Delete every edge naming any of `ids` on either end.
    pub async fn delete_for_folders(conn: &mut SqliteConnection, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut builder =
            QueryBuilder::<Sqlite>::new("DELETE FROM folder_hierarchy WHERE folder_id IN ");
        push_id_list(&mut builder, ids);
        builder.push(" OR ancestor_id IN ");
        push_id_list(&mut builder, ids);

        let result = builder.build().execute(&mut *conn).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete hierarchy edges", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Count edges naming any of `ids` on either end.
    pub async fn count_referencing(conn: &mut SqliteConnection, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut builder =
            QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM folder_hierarchy WHERE folder_id IN ");
        push_id_list(&mut builder, ids);
        builder.push(" OR ancestor_id IN ");
        push_id_list(&mut builder, ids);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count edges", e))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::FolderRepository;
    use crate::repositories::test_support::migrated_pool;
    use treevault_entity::folder::CreateFolder;

    async fn folder(conn: &mut SqliteConnection, parent: Option<Uuid>, name: &str) -> Uuid {
        let created = FolderRepository::create(
            conn,
            &CreateFolder {
                parent_id: parent,
                name: name.to_string(),
                path: name.to_string(),
            },
        )
        .await
        .unwrap();
        HierarchyRepository::insert_self_edge(conn, created.id).await.unwrap();
        if let Some(parent) = parent {
            HierarchyRepository::copy_ancestors(conn, created.id, parent)
                .await
                .unwrap();
        }
        created.id
    }

    #[tokio::test]
    async fn test_copy_ancestors_shifts_depth() {
        let (db, _dir) = migrated_pool().await;
        let mut conn = db.acquire().await.unwrap();

        let root = folder(&mut conn, None, "root").await;
        let a = folder(&mut conn, Some(root), "a").await;
        let b = folder(&mut conn, Some(a), "b").await;

        let edges = HierarchyRepository::find_by_folder(&mut conn, b).await.unwrap();
        let pairs: Vec<(Uuid, i32)> = edges.iter().map(|e| (e.ancestor_id, e.depth)).collect();
        assert_eq!(pairs, vec![(b, 0), (a, 1), (root, 2)]);
        assert_eq!(
            HierarchyRepository::max_depth(&mut conn, b).await.unwrap(),
            Some(2)
        );

        let chain = HierarchyRepository::find_ancestors(&mut conn, b).await.unwrap();
        let names: Vec<&str> = chain.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["root", "a", "b"]);
    }

    #[tokio::test]
    async fn test_delete_for_folders_removes_both_ends() {
        let (db, _dir) = migrated_pool().await;
        let mut conn = db.acquire().await.unwrap();

        let root = folder(&mut conn, None, "root").await;
        let a = folder(&mut conn, Some(root), "a").await;
        let b = folder(&mut conn, Some(a), "b").await;

        let removed = HierarchyRepository::delete_for_folders(&mut conn, &[a, b])
            .await
            .unwrap();
        assert_eq!(removed, 5);
        assert_eq!(
            HierarchyRepository::count_referencing(&mut conn, &[a, b])
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            HierarchyRepository::find_by_folder(&mut conn, root)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
