//! Repository implementations for the catalog tables.

pub mod file;
pub mod file_type;
pub mod folder;
pub mod hierarchy;

pub use file::FileRepository;
pub use file_type::FileTypeRepository;
pub use folder::FolderRepository;
pub use hierarchy::HierarchyRepository;

use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

/// Append `(?, ?, ...)` binding every id to an `IN` clause.
pub(crate) fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[Uuid]) {
    builder.push("(");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;
    use treevault_core::config::DatabaseConfig;

    use crate::DatabasePool;
    use crate::migration::run_migrations;

    /// A migrated database in a throwaway directory.
    pub(crate) async fn migrated_pool() -> (DatabasePool, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("catalog.db").display()),
            ..DatabaseConfig::default()
        };
        let db = DatabasePool::connect(&config).await.unwrap();
        run_migrations(db.pool()).await.unwrap();
        (db, dir)
    }
}
