//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use treevault_core::config::AppConfig;
use treevault_database::DatabasePool;
use treevault_service::{FileTypeService, StorageService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Catalog database pool
    pub db: DatabasePool,
    /// Folder, file and mirror orchestration
    pub storage_service: Arc<StorageService>,
    /// File type registry
    pub file_type_service: Arc<FileTypeService>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wire the services over a connected pool and mirror.
    pub fn new(
        config: AppConfig,
        db: DatabasePool,
        mirror: Arc<dyn treevault_core::traits::MirrorStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage_service: Arc::new(StorageService::new(db.clone(), mirror)),
            file_type_service: Arc::new(FileTypeService::new(db.clone())),
            db,
            started_at: Instant::now(),
        }
    }
}
