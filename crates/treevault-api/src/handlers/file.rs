//! File handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use treevault_service::storage::{
    CreateFileRequest as SvcCreateFile, UpdateFileRequest as SvcUpdateFile,
};

use crate::dto::request::{
    CreateFileRequest, DeleteFileByPathRequest, FileSearchQuery, UpdateFileRequest,
    decode_content,
};
use crate::dto::response::{ApiResponse, FileResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// `Content-Disposition` value for a download, with the file name quoted.
fn attachment_disposition(file_name: &str) -> String {
    let escaped = file_name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("attachment; filename=\"{escaped}\"")
}

fn to_responses(files: Vec<treevault_entity::file::FileEntry>) -> Vec<FileResponse> {
    files.into_iter().map(FileResponse::from).collect()
}

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let files = state.storage_service.list_files().await?;
    Ok(Json(ApiResponse::ok(to_responses(files))))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let file = state.storage_service.get_file(id).await?;
    Ok(Json(ApiResponse::ok(file.into())))
}

/// GET /api/files/{id}/content
pub async fn get_file_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let (entry, data) = state.storage_service.file_content(id).await?;
    let disposition = attachment_disposition(&entry.disk_name());
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

/// GET /api/files/by-folder/{folder_id}
pub async fn list_files_in_folder(
    State(state): State<AppState>,
    Path(folder_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let files = state.storage_service.files_in_folder(folder_id).await?;
    Ok(Json(ApiResponse::ok(to_responses(files))))
}

/// GET /api/files/by-type/{file_type}
pub async fn list_files_by_type(
    State(state): State<AppState>,
    Path(file_type): Path<String>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let files = state.storage_service.files_by_type(&file_type).await?;
    Ok(Json(ApiResponse::ok(to_responses(files))))
}

/// GET /api/files/search?folder_path=a/b&file_type=txt
pub async fn search_files(
    State(state): State<AppState>,
    Query(query): Query<FileSearchQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let files = state
        .storage_service
        .search_files(&query.folder_path, query.file_type.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(to_responses(files))))
}

/// POST /api/files
pub async fn create_file(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateFileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FileResponse>>), ApiError> {
    let data = decode_content(&req.content)?;
    let file = state
        .storage_service
        .create_file(SvcCreateFile {
            folder_path: req.folder_path,
            name: req.name.trim().to_string(),
            file_type: req.file_type,
            size: req.size,
            data,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(file.into()))))
}

/// PUT /api/files/{id}
pub async fn update_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateFileRequest>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let data = req.content.as_deref().map(decode_content).transpose()?;
    let file = state
        .storage_service
        .update_file(
            id,
            SvcUpdateFile {
                name: req.name.map(|n| n.trim().to_string()),
                folder_id: req.folder_id,
                file_type: req.file_type,
                size: req.size,
                data,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(file.into())))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let file = state.storage_service.delete_file(id).await?;
    Ok(Json(ApiResponse::ok(file.into())))
}

/// POST /api/files/delete-by-path
pub async fn delete_file_by_path(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<DeleteFileByPathRequest>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let file = state
        .storage_service
        .delete_file_by_path(&req.full_path, &req.file_type)
        .await?;
    Ok(Json(ApiResponse::ok(file.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_disposition_quotes_name() {
        assert_eq!(
            attachment_disposition("doc.txt"),
            "attachment; filename=\"doc.txt\""
        );
        assert_eq!(
            attachment_disposition("say \"hi\".txt"),
            "attachment; filename=\"say \\\"hi\\\".txt\""
        );
    }
}
