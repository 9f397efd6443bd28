//! Folder repository implementation.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use uuid::Uuid;

use treevault_core::error::{AppError, ErrorKind};
use treevault_core::result::AppResult;
use treevault_core::types::ROOT_FOLDER_NAME;
use treevault_entity::folder::{CreateFolder, Folder};

use super::push_id_list;

/// Row-level queries against the `folders` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderRepository;

impl FolderRepository {
    /// Find a folder by ID.
    pub async fn find_by_id(conn: &mut SqliteConnection, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find the synthetic root folder.
    pub async fn find_root(conn: &mut SqliteConnection) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id IS NULL AND name = ?")
            .bind(ROOT_FOLDER_NAME)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find root folder", e))
    }

    /// Find a direct child of `parent_id` by name.
    pub async fn find_child(
        conn: &mut SqliteConnection,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id = ? AND name = ?")
            .bind(parent_id)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find folder by name", e)
            })
    }

    /// List every folder, ordered by logical path.
    pub async fn find_all(conn: &mut SqliteConnection) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders ORDER BY path ASC")
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// List direct children of a folder.
    pub async fn find_children(
        conn: &mut SqliteConnection,
        parent_id: Uuid,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE parent_id = ? ORDER BY name ASC")
            .bind(parent_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// Fetch a set of folders by ID.
    pub async fn find_by_ids(conn: &mut SqliteConnection, ids: &[Uuid]) -> AppResult<Vec<Folder>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM folders WHERE id IN ");
        push_id_list(&mut builder, ids);
        builder
            .build_query_as::<Folder>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch folders", e))
    }

    /// Create a new folder row.
    pub async fn create(conn: &mut SqliteConnection, data: &CreateFolder) -> AppResult<Folder> {
        let now = Utc::now();
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, parent_id, path, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(data.parent_id)
        .bind(&data.path)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Folder '{}' already exists", data.path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    /// Rename a folder. Its cached path is updated separately.
    pub async fn rename(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
        new_name: &str,
    ) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(new_name)
        .bind(Utc::now())
        .bind(folder_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Folder name '{new_name}' already exists in parent"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to rename folder", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Overwrite a folder's cached logical path.
    pub async fn update_path(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
        path: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE folders SET path = ? WHERE id = ?")
            .bind(path)
            .bind(folder_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update folder path", e)
            })?;
        Ok(())
    }

    /// Delete a single folder row.
    pub async fn delete(conn: &mut SqliteConnection, folder_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = ?")
            .bind(folder_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Count folder rows.
    pub async fn count(conn: &mut SqliteConnection) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count folders", e))?;
        Ok(count as u64)
    }
}
