//! File catalog repository implementation.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use uuid::Uuid;

use treevault_core::error::{AppError, ErrorKind};
use treevault_core::result::AppResult;
use treevault_entity::file::{CreateFile, FileEntry};

use super::push_id_list;

/// File rows joined with their type name.
const SELECT_FILES: &str = "SELECT f.id, f.name, f.folder_id, f.file_type_id, t.type AS file_type, \
     f.size, f.data, f.path, f.created_at, f.updated_at \
     FROM files f JOIN file_types t ON t.id = f.file_type_id";

/// Row-level queries against the `files` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRepository;

impl FileRepository {
    /// Find a file by ID.
    pub async fn find_by_id(conn: &mut SqliteConnection, id: Uuid) -> AppResult<Option<FileEntry>> {
        sqlx::query_as::<_, FileEntry>(&format!("{SELECT_FILES} WHERE f.id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// List every file, ordered by logical path.
    pub async fn find_all(conn: &mut SqliteConnection) -> AppResult<Vec<FileEntry>> {
        sqlx::query_as::<_, FileEntry>(&format!("{SELECT_FILES} ORDER BY f.path ASC, t.type ASC"))
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// List the files directly inside a folder.
    pub async fn find_by_folder(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
    ) -> AppResult<Vec<FileEntry>> {
        sqlx::query_as::<_, FileEntry>(&format!(
            "{SELECT_FILES} WHERE f.folder_id = ? ORDER BY f.name ASC, t.type ASC"
        ))
        .bind(folder_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folder files", e))
    }

    /// List every file of a type.
    pub async fn find_by_type(
        conn: &mut SqliteConnection,
        type_name: &str,
    ) -> AppResult<Vec<FileEntry>> {
        sqlx::query_as::<_, FileEntry>(&format!(
            "{SELECT_FILES} WHERE t.type = ? ORDER BY f.path ASC"
        ))
        .bind(type_name)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files by type", e))
    }

    /// Files whose path sits directly under `folder_path`, optionally of one type.
    ///
    /// An empty `folder_path` selects files directly under the root.
    pub async fn find_by_folder_prefix(
        conn: &mut SqliteConnection,
        folder_path: &str,
        type_name: Option<&str>,
    ) -> AppResult<Vec<FileEntry>> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_FILES);
        if folder_path.is_empty() {
            builder.push(" WHERE instr(f.path, '/') = 0");
        } else {
            let needle = format!("{folder_path}/");
            let start = needle.chars().count() as i64;
            builder
                .push(" WHERE substr(f.path, 1, ")
                .push_bind(start)
                .push(") = ")
                .push_bind(needle)
                .push(" AND instr(substr(f.path, ")
                .push_bind(start + 1)
                .push("), '/') = 0");
        }
        if let Some(type_name) = type_name {
            builder.push(" AND t.type = ").push_bind(type_name.to_string());
        }
        builder.push(" ORDER BY f.path ASC, t.type ASC");

        builder
            .build_query_as::<FileEntry>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search files", e))
    }

    /// Find the file holding `(folder, name, type)`.
    pub async fn find_by_identity(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
        name: &str,
        file_type_id: Uuid,
    ) -> AppResult<Option<FileEntry>> {
        sqlx::query_as::<_, FileEntry>(&format!(
            "{SELECT_FILES} WHERE f.folder_id = ? AND f.name = ? AND f.file_type_id = ?"
        ))
        .bind(folder_id)
        .bind(name)
        .bind(file_type_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Whether another file already holds `(folder, name, type)`.
    pub async fn exists_identity(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
        name: &str,
        file_type_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM files \
             WHERE folder_id = ? AND name = ? AND file_type_id = ? AND (? IS NULL OR id <> ?)",
        )
        .bind(folder_id)
        .bind(name)
        .bind(file_type_id)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check file identity", e))?;
        Ok(count > 0)
    }

    /// Insert a file row with its computed path.
    pub async fn create(
        conn: &mut SqliteConnection,
        data: &CreateFile,
        path: &str,
    ) -> AppResult<FileEntry> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO files \
             (id, name, folder_id, file_type_id, size, data, path, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.folder_id)
        .bind(data.file_type_id)
        .bind(data.size)
        .bind(&data.data)
        .bind(path)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("File '{path}' already exists"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })?;

        Self::find_by_id(conn, id)
            .await?
            .ok_or_else(|| AppError::internal("Inserted file row could not be read back"))
    }

    /// Persist every mutable column of `entry`.
    pub async fn update(conn: &mut SqliteConnection, entry: &FileEntry) -> AppResult<FileEntry> {
        let result = sqlx::query(
            "UPDATE files SET name = ?, folder_id = ?, file_type_id = ?, size = ?, data = ?, \
             path = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&entry.name)
        .bind(entry.folder_id)
        .bind(entry.file_type_id)
        .bind(entry.size)
        .bind(&entry.data)
        .bind(&entry.path)
        .bind(Utc::now())
        .bind(entry.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("File '{}' already exists", entry.path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update file", e),
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("File {} not found", entry.id)));
        }

        Self::find_by_id(conn, entry.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {} not found", entry.id)))
    }

    /// Rewrite the cached path of every file in a folder to `<folder_path>/<name>`.
    pub async fn update_paths_in_folder(
        conn: &mut SqliteConnection,
        folder_id: Uuid,
        folder_path: &str,
    ) -> AppResult<u64> {
        let prefix = if folder_path.is_empty() {
            String::new()
        } else {
            format!("{folder_path}/")
        };
        let result = sqlx::query("UPDATE files SET path = ? || name WHERE folder_id = ?")
            .bind(prefix)
            .bind(folder_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file paths", e))?;
        Ok(result.rows_affected())
    }

    /// Delete a single file row.
    pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every file owned by any of `folder_ids`.
    pub async fn delete_by_folders(conn: &mut SqliteConnection, folder_ids: &[Uuid]) -> AppResult<u64> {
        if folder_ids.is_empty() {
            return Ok(0);
        }
        let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM files WHERE folder_id IN ");
        push_id_list(&mut builder, folder_ids);

        let result = builder.build().execute(&mut *conn).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete folder files", e)
        })?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::migrated_pool;
    use crate::repositories::{FileTypeRepository, FolderRepository};
    use treevault_entity::folder::CreateFolder;

    async fn folder(conn: &mut SqliteConnection, parent: Option<Uuid>, name: &str, path: &str) -> Uuid {
        FolderRepository::create(
            conn,
            &CreateFolder {
                parent_id: parent,
                name: name.to_string(),
                path: path.to_string(),
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn file(conn: &mut SqliteConnection, folder_id: Uuid, type_id: Uuid, name: &str, path: &str) {
        FileRepository::create(
            conn,
            &CreateFile {
                name: name.to_string(),
                folder_id,
                file_type_id: type_id,
                size: 1,
                data: vec![b'x'],
            },
            path,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_find_by_folder_prefix_is_direct_children_only() {
        let (db, _dir) = migrated_pool().await;
        let mut conn = db.acquire().await.unwrap();

        let txt = FileTypeRepository::create(&mut conn, "txt").await.unwrap().id;
        let pdf = FileTypeRepository::create(&mut conn, "pdf").await.unwrap().id;
        let root = folder(&mut conn, None, "root", "").await;
        let a = folder(&mut conn, Some(root), "a", "a").await;
        let b = folder(&mut conn, Some(a), "b", "a/b").await;

        file(&mut conn, root, txt, "top", "top").await;
        file(&mut conn, a, txt, "one", "a/one").await;
        file(&mut conn, a, pdf, "two", "a/two").await;
        file(&mut conn, b, txt, "deep", "a/b/deep").await;

        let under_a = FileRepository::find_by_folder_prefix(&mut conn, "a", None)
            .await
            .unwrap();
        let paths: Vec<&str> = under_a.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a/one", "a/two"]);

        let txt_under_a = FileRepository::find_by_folder_prefix(&mut conn, "a", Some("txt"))
            .await
            .unwrap();
        assert_eq!(txt_under_a.len(), 1);
        assert_eq!(txt_under_a[0].file_type, "txt");

        let under_root = FileRepository::find_by_folder_prefix(&mut conn, "", None)
            .await
            .unwrap();
        assert_eq!(under_root.len(), 1);
        assert_eq!(under_root[0].path, "top");
    }

    #[tokio::test]
    async fn test_duplicate_identity_is_conflict() {
        let (db, _dir) = migrated_pool().await;
        let mut conn = db.acquire().await.unwrap();

        let txt = FileTypeRepository::create(&mut conn, "txt").await.unwrap().id;
        let root = folder(&mut conn, None, "root", "").await;
        file(&mut conn, root, txt, "doc", "doc").await;

        assert!(
            FileRepository::exists_identity(&mut conn, root, "doc", txt, None)
                .await
                .unwrap()
        );

        let err = FileRepository::create(
            &mut conn,
            &CreateFile {
                name: "doc".into(),
                folder_id: root,
                file_type_id: txt,
                size: 0,
                data: Vec::new(),
            },
            "doc",
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_update_paths_in_folder() {
        let (db, _dir) = migrated_pool().await;
        let mut conn = db.acquire().await.unwrap();

        let txt = FileTypeRepository::create(&mut conn, "txt").await.unwrap().id;
        let root = folder(&mut conn, None, "root", "").await;
        let a = folder(&mut conn, Some(root), "a", "a").await;
        file(&mut conn, a, txt, "doc", "a/doc").await;

        FileRepository::update_paths_in_folder(&mut conn, a, "z")
            .await
            .unwrap();
        let files = FileRepository::find_by_folder(&mut conn, a).await.unwrap();
        assert_eq!(files[0].path, "z/doc");
    }
}
