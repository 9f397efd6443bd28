//! Startup seeding of the catalog.

use tracing::info;

use treevault_core::config::CatalogConfig;
use treevault_core::result::AppResult;
use treevault_database::DatabasePool;
use treevault_database::connection::commit;
use treevault_entity::folder::Folder;

use crate::file_type::FileTypeRegistry;
use crate::folder::FolderTree;

/// Ensure the root folder exists and seed the configured file types.
///
/// Safe to run on every startup.
pub async fn bootstrap(db: &DatabasePool, config: &CatalogConfig) -> AppResult<Folder> {
    let mut tx = db.begin().await?;

    let root = FolderTree::ensure_root(&mut tx).await?;
    let mut seeded = 0usize;
    for raw in &config.default_file_types {
        let (_, created) = FileTypeRegistry::ensure(&mut tx, raw).await?;
        if created {
            seeded += 1;
        }
    }

    commit(tx).await?;
    info!(root_id = %root.id, seeded_file_types = seeded, "Catalog bootstrapped");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::catalog;

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let t = catalog().await;
        let config = CatalogConfig::default();

        let first = bootstrap(&t.db, &config).await.unwrap();
        let second = bootstrap(&t.db, &config).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.id, t.root.id);

        let mut conn = t.db.acquire().await.unwrap();
        let types: Vec<String> = FileTypeRegistry::list(&mut conn)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.type_name)
            .collect();
        assert_eq!(types, vec!["docx", "jpg", "pdf", "png", "txt"]);
    }
}
