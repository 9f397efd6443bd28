//! File type handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use treevault_entity::file_type::FileType;

use crate::dto::request::CreateFileTypeRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// GET /api/file-types
pub async fn list_file_types(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<FileType>>>, ApiError> {
    let types = state.file_type_service.list_file_types().await?;
    Ok(Json(ApiResponse::ok(types)))
}

/// GET /api/file-types/{id}
pub async fn get_file_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileType>>, ApiError> {
    let file_type = state.file_type_service.get_file_type(id).await?;
    Ok(Json(ApiResponse::ok(file_type)))
}

/// POST /api/file-types
pub async fn create_file_type(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateFileTypeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FileType>>), ApiError> {
    let file_type = state
        .file_type_service
        .add_file_type(&req.type_name)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(file_type))))
}
