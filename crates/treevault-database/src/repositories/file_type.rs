//! File type repository implementation.

use sqlx::SqliteConnection;
use uuid::Uuid;

use treevault_core::error::{AppError, ErrorKind};
use treevault_core::result::AppResult;
use treevault_entity::file_type::FileType;

/// Queries against the `file_types` lookup table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTypeRepository;

impl FileTypeRepository {
    /// List all registered types, alphabetically.
    pub async fn find_all(conn: &mut SqliteConnection) -> AppResult<Vec<FileType>> {
        sqlx::query_as::<_, FileType>("SELECT * FROM file_types ORDER BY type ASC")
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list file types", e))
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: Uuid) -> AppResult<Option<FileType>> {
        sqlx::query_as::<_, FileType>("SELECT * FROM file_types WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file type", e))
    }

    pub async fn find_by_type(
        conn: &mut SqliteConnection,
        type_name: &str,
    ) -> AppResult<Option<FileType>> {
        sqlx::query_as::<_, FileType>("SELECT * FROM file_types WHERE type = ?")
            .bind(type_name)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file type", e))
    }

    /// Insert a new type. The name must already be normalised.
    pub async fn create(conn: &mut SqliteConnection, type_name: &str) -> AppResult<FileType> {
        sqlx::query_as::<_, FileType>("INSERT INTO file_types (id, type) VALUES (?, ?) RETURNING *")
            .bind(Uuid::new_v4())
            .bind(type_name)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    AppError::conflict(format!("File type '{type_name}' already exists"))
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to create file type", e),
            })
    }
}
