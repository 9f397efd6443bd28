//! # treevault-api
//!
//! HTTP API layer for TreeVault built on Axum.
//!
//! Provides the REST endpoints for folders, files and file types, request
//! validation, error mapping, and the request logging and CORS middleware.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
