//! Shared fixtures for unit tests.

use tempfile::TempDir;
use treevault_core::config::DatabaseConfig;
use treevault_database::DatabasePool;
use treevault_database::migration::run_migrations;
use treevault_database::repositories::FileTypeRepository;
use treevault_entity::file_type::FileType;
use treevault_entity::folder::Folder;

use crate::folder::FolderTree;

/// A migrated catalog with its root folder in place.
pub(crate) struct TestCatalog {
    pub db: DatabasePool,
    pub root: Folder,
    pub dir: TempDir,
}

pub(crate) async fn catalog() -> TestCatalog {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("catalog.db").display()),
        ..DatabaseConfig::default()
    };
    let db = DatabasePool::connect(&config).await.unwrap();
    run_migrations(db.pool()).await.unwrap();

    let mut conn = db.acquire().await.unwrap();
    let root = FolderTree::ensure_root(&mut conn).await.unwrap();
    drop(conn);

    TestCatalog { db, root, dir }
}

pub(crate) async fn file_type(db: &DatabasePool, name: &str) -> FileType {
    let mut conn = db.acquire().await.unwrap();
    FileTypeRepository::create(&mut conn, name).await.unwrap()
}

pub(crate) fn segments(path: &str) -> Vec<String> {
    treevault_core::types::PathCodec::split(path)
}
