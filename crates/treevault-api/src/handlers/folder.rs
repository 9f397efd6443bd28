//! Folder handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::dto::request::{CreateFolderRequest, FolderPathQuery, RenameFolderRequest};
use crate::dto::response::{ApiResponse, DeletedFolderResponse, FolderResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// GET /api/folders
pub async fn list_folders(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<FolderResponse>>>, ApiError> {
    let folders = state.storage_service.list_folders().await?;
    Ok(Json(ApiResponse::ok(
        folders.into_iter().map(FolderResponse::from).collect(),
    )))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FolderResponse>>, ApiError> {
    let folder = state.storage_service.get_folder(id).await?;
    Ok(Json(ApiResponse::ok(folder.into())))
}

/// GET /api/folders/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<FolderResponse>>>, ApiError> {
    let children = state.storage_service.folder_children(id).await?;
    Ok(Json(ApiResponse::ok(
        children.into_iter().map(FolderResponse::from).collect(),
    )))
}

/// GET /api/folders/by-path?path=a/b
pub async fn get_folder_by_path(
    State(state): State<AppState>,
    Query(query): Query<FolderPathQuery>,
) -> Result<Json<ApiResponse<FolderResponse>>, ApiError> {
    let folder = state.storage_service.folder_by_path(&query.path).await?;
    Ok(Json(ApiResponse::ok(folder.into())))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FolderResponse>>), ApiError> {
    let folder = state.storage_service.create_folder(&req.path).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder.into()))))
}

/// PUT /api/folders/{id}/rename
pub async fn rename_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<RenameFolderRequest>,
) -> Result<Json<ApiResponse<FolderResponse>>, ApiError> {
    let folder = state
        .storage_service
        .rename_folder(id, &req.new_name)
        .await?;
    Ok(Json(ApiResponse::ok(folder.into())))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedFolderResponse>>, ApiError> {
    let deleted = state.storage_service.delete_folder(id).await?;
    Ok(Json(ApiResponse::ok(deleted.into())))
}
