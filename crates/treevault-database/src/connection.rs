//! SQLite connection pool management.

use std::str::FromStr;
use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::info;

use treevault_core::config::DatabaseConfig;
use treevault_core::error::{AppError, ErrorKind};
use treevault_core::result::AppResult;

/// A catalog transaction. Dropping it without `commit()` rolls back.
pub type CatalogTx = Transaction<'static, Sqlite>;

/// Wrapper around the sqlx SQLite connection pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    /// The underlying sqlx connection pool.
    pool: SqlitePool,
}

impl DatabasePool {
    /// Create a new database pool from configuration.
    ///
    /// The database file (and its directory) is created if missing, and
    /// foreign keys are enforced on every connection.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(
            url = %config.url,
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to SQLite"
        );

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Invalid database URL '{}'", config.url),
                    e,
                )
            })?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(config.busy_timeout_seconds));

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        format!("Failed to create database directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("Successfully connected to SQLite");
        Ok(Self { pool })
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a catalog write transaction.
    ///
    /// Opened with `BEGIN IMMEDIATE` so the write lock is taken up front.
    /// Concurrent writers queue on `busy_timeout` and then see the winner's
    /// committed rows, which turns a racing duplicate into a Conflict instead
    /// of a failed read-to-write lock upgrade.
    pub async fn begin(&self) -> AppResult<CatalogTx> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))
    }

    /// Check out a single connection for read-only work.
    pub async fn acquire(&self) -> AppResult<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e))
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// Commit a catalog transaction, mapping the failure into [`AppError`].
pub async fn commit(tx: CatalogTx) -> AppResult<()> {
    tx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("catalog.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            ..DatabaseConfig::default()
        };

        let db = DatabasePool::connect(&config).await.unwrap();
        assert!(db.health_check().await.unwrap());
        assert!(db_path.exists());
        db.close().await;
    }

    #[tokio::test]
    async fn test_begin_takes_write_lock() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("catalog.db").display()),
            busy_timeout_seconds: 0,
            ..DatabaseConfig::default()
        };
        let db = DatabasePool::connect(&config).await.unwrap();

        let first = db.begin().await.unwrap();
        let err = db.begin().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);

        first.rollback().await.unwrap();
        let second = db.begin().await.unwrap();
        commit(second).await.unwrap();
    }
}
