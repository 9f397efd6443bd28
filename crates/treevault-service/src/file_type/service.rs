//! File type use cases over the connection pool.

use tracing::info;
use uuid::Uuid;

use treevault_core::result::AppResult;
use treevault_database::DatabasePool;
use treevault_database::connection::commit;
use treevault_entity::file_type::FileType;

use super::registry::FileTypeRegistry;

/// Manages the file type registry.
#[derive(Debug, Clone)]
pub struct FileTypeService {
    /// Catalog database.
    db: DatabasePool,
}

impl FileTypeService {
    /// Creates a new file type service.
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    /// Lists all registered file types.
    pub async fn list_file_types(&self) -> AppResult<Vec<FileType>> {
        let mut conn = self.db.acquire().await?;
        FileTypeRegistry::list(&mut conn).await
    }

    /// Gets a file type by ID.
    pub async fn get_file_type(&self, id: Uuid) -> AppResult<FileType> {
        let mut conn = self.db.acquire().await?;
        FileTypeRegistry::get(&mut conn, id).await
    }

    /// Registers a new file type.
    pub async fn add_file_type(&self, raw: &str) -> AppResult<FileType> {
        let mut tx = self.db.begin().await?;
        let file_type = FileTypeRegistry::add(&mut tx, raw).await?;
        commit(tx).await?;

        info!(file_type_id = %file_type.id, file_type = %file_type.type_name, "File type added");
        Ok(file_type)
    }
}
