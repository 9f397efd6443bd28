//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use treevault_core::config::{AppConfig, DatabaseConfig, StorageConfig};
use treevault_core::traits::MirrorStore;
use treevault_database::DatabasePool;
use treevault_service::StorageService;
use treevault_storage::LocalDiskMirror;

/// A migrated, bootstrapped catalog with a mirror rooted in a temp dir.
pub struct TestVault {
    /// Catalog database pool
    pub db: DatabasePool,
    /// Orchestrator over the catalog and `mirror`
    pub service: StorageService,
    /// Mirror root directory
    pub mirror_root: PathBuf,
    /// Application config pointing at the temp dir
    pub config: AppConfig,
    _dir: TempDir,
}

impl TestVault {
    /// Build a vault backed by the local disk mirror.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mirror_root = dir.path().join("public");
        let mirror = LocalDiskMirror::new(&mirror_root)
            .await
            .expect("Failed to init mirror");
        Self::with_mirror(dir, mirror_root, Arc::new(mirror)).await
    }

    /// Build a vault around an arbitrary mirror implementation.
    pub async fn with_mirror(
        dir: TempDir,
        mirror_root: PathBuf,
        mirror: Arc<dyn MirrorStore>,
    ) -> Self {
        let config = test_config(dir.path(), &mirror_root);
        let db = connect(&config.database).await;
        treevault_service::bootstrap(&db, &config.catalog)
            .await
            .expect("Failed to bootstrap catalog");

        Self {
            service: StorageService::new(db.clone(), mirror),
            db,
            mirror_root,
            config,
            _dir: dir,
        }
    }

    /// Path of a mirrored entry relative to the mirror root.
    pub fn disk(&self, relative: &str) -> PathBuf {
        self.mirror_root.join(relative)
    }
}

/// Config whose database and mirror live under `dir`.
pub fn test_config(dir: &Path, mirror_root: &Path) -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: format!("sqlite://{}", dir.join("catalog.db").display()),
            ..DatabaseConfig::default()
        },
        storage: StorageConfig {
            root_path: mirror_root.display().to_string(),
            ..StorageConfig::default()
        },
        ..AppConfig::default()
    }
}

/// Connect and migrate.
pub async fn connect(config: &DatabaseConfig) -> DatabasePool {
    let db = DatabasePool::connect(config)
        .await
        .expect("Failed to connect to test database");
    treevault_database::migration::run_migrations(db.pool())
        .await
        .expect("Failed to run migrations");
    db
}

/// Test application wrapping the full router.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Underlying vault, for direct assertions
    pub vault: TestVault,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let vault = TestVault::new().await;
        let mirror = LocalDiskMirror::new(&vault.mirror_root)
            .await
            .expect("Failed to init mirror");
        let state = treevault_api::AppState::new(
            vault.config.clone(),
            vault.db.clone(),
            Arc::new(mirror),
        );
        let router = treevault_api::router::build_router(state);
        Self { router, vault }
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let raw = self.raw_request(method, path, body).await;
        let body = serde_json::from_slice(&raw.body).unwrap_or(Value::Null);
        TestResponse {
            status: raw.status,
            body,
        }
    }

    /// Make an HTTP request and keep the body as bytes.
    pub async fn raw_request(&self, method: &str, path: &str, body: Option<Value>) -> RawResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        RawResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` field of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

/// Response with an unparsed body.
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}
