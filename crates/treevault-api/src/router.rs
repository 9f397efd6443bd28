//! Route definitions for the TreeVault HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with body limit and request logging.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(file_routes())
        .merge(file_type_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Folder tree endpoints
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route("/folders/by-path", get(handlers::folder::get_folder_by_path))
        .route(
            "/folders/{id}",
            get(handlers::folder::get_folder).delete(handlers::folder::delete_folder),
        )
        .route("/folders/{id}/children", get(handlers::folder::list_children))
        .route("/folders/{id}/rename", put(handlers::folder::rename_folder))
}

/// File catalog endpoints
fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files",
            get(handlers::file::list_files).post(handlers::file::create_file),
        )
        .route("/files/search", get(handlers::file::search_files))
        .route("/files/delete-by-path", post(handlers::file::delete_file_by_path))
        .route(
            "/files/by-type/{file_type}",
            get(handlers::file::list_files_by_type),
        )
        .route(
            "/files/by-folder/{folder_id}",
            get(handlers::file::list_files_in_folder),
        )
        .route(
            "/files/{id}",
            get(handlers::file::get_file)
                .put(handlers::file::update_file)
                .delete(handlers::file::delete_file),
        )
        .route("/files/{id}/content", get(handlers::file::get_file_content))
}

/// File type registry endpoints
fn file_type_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/file-types",
            get(handlers::file_type::list_file_types).post(handlers::file_type::create_file_type),
        )
        .route("/file-types/{id}", get(handlers::file_type::get_file_type))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
