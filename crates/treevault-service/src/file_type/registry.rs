//! Keyed lookup over the `file_types` table.

use sqlx::SqliteConnection;
use uuid::Uuid;

use treevault_core::error::AppError;
use treevault_core::result::AppResult;
use treevault_database::repositories::FileTypeRepository;
use treevault_entity::file_type::FileType;

/// File type lookups on the caller's connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTypeRegistry;

impl FileTypeRegistry {
    pub async fn list(conn: &mut SqliteConnection) -> AppResult<Vec<FileType>> {
        FileTypeRepository::find_all(conn).await
    }

    /// Register a new type. Input is trimmed and lower-cased.
    pub async fn add(conn: &mut SqliteConnection, raw: &str) -> AppResult<FileType> {
        let type_name = Self::normalized(raw)?;
        if FileTypeRepository::find_by_type(conn, &type_name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "File type '{type_name}' already exists"
            )));
        }
        FileTypeRepository::create(conn, &type_name).await
    }

    /// Register a type unless it already exists. Returns the type and whether
    /// it was created.
    pub async fn ensure(conn: &mut SqliteConnection, raw: &str) -> AppResult<(FileType, bool)> {
        let type_name = Self::normalized(raw)?;
        match FileTypeRepository::find_by_type(conn, &type_name).await? {
            Some(existing) => Ok((existing, false)),
            None => Ok((FileTypeRepository::create(conn, &type_name).await?, true)),
        }
    }

    pub async fn get(conn: &mut SqliteConnection, id: Uuid) -> AppResult<FileType> {
        FileTypeRepository::find_by_id(conn, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File type {id} not found")))
    }

    /// Resolve a type by name, e.g. `"TXT"` or `"txt"`.
    pub async fn resolve(conn: &mut SqliteConnection, raw: &str) -> AppResult<FileType> {
        let type_name = Self::normalized(raw)?;
        FileTypeRepository::find_by_type(conn, &type_name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File type '{type_name}' not found")))
    }

    fn normalized(raw: &str) -> AppResult<String> {
        let type_name = FileType::normalize(raw);
        if type_name.is_empty() {
            return Err(AppError::validation("File type cannot be empty"));
        }
        if type_name.contains(['/', '\\', '.']) {
            return Err(AppError::validation(format!(
                "File type '{type_name}' cannot contain '/', '\\' or '.'"
            )));
        }
        Ok(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treevault_core::error::ErrorKind;

    use crate::testing::catalog;

    #[tokio::test]
    async fn test_add_normalizes_and_conflicts() {
        let t = catalog().await;
        let mut conn = t.db.acquire().await.unwrap();

        let added = FileTypeRegistry::add(&mut conn, "  PDF ").await.unwrap();
        assert_eq!(added.type_name, "pdf");

        let err = FileTypeRegistry::add(&mut conn, "pdf").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = FileTypeRegistry::add(&mut conn, "   ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_resolve_and_get() {
        let t = catalog().await;
        let mut conn = t.db.acquire().await.unwrap();
        let txt = FileTypeRegistry::add(&mut conn, "txt").await.unwrap();

        assert_eq!(FileTypeRegistry::resolve(&mut conn, "TXT").await.unwrap(), txt);
        assert_eq!(FileTypeRegistry::get(&mut conn, txt.id).await.unwrap(), txt);

        let err = FileTypeRegistry::resolve(&mut conn, "exe").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = FileTypeRegistry::get(&mut conn, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let t = catalog().await;
        let mut conn = t.db.acquire().await.unwrap();

        let (first, created) = FileTypeRegistry::ensure(&mut conn, "png").await.unwrap();
        assert!(created);
        let (second, created) = FileTypeRegistry::ensure(&mut conn, "PNG").await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(FileTypeRegistry::list(&mut conn).await.unwrap().len(), 1);
    }
}
