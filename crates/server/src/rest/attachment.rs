use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use shared_types::{AppError, AttachmentRow, BlobLocation};
use crate::storage::StorageService;

/// GET /api/records/{record_id}/attachments
///
/// List the attachments registered for a record.
#[utoipa::path(
    get,
    path = "/api/records/{record_id}/attachments",
    params(
        ("record_id" = String, Path, description = "Record identifier")
    ),
    responses(
        (status = 200, description = "Attachment rows", body = Vec<AttachmentRow>),
        (status = 400, description = "Invalid record id", body = AppError)
    ),
    tag = "attachments"
)]
pub async fn list_record_attachments(
    State(pool): State<Pool<Postgres>>,
    Path(record_id): Path<String>,
) -> Result<Json<Vec<AttachmentRow>>, AppError> {
    let record_id = record_id.trim();
    if record_id.is_empty() {
        return Err(AppError::bad_request("record_id must not be empty"));
    }

    let rows = crate::repo::attachment::list_for_record(&pool, record_id).await?;
    Ok(Json(rows))
}

/// GET /api/attachments/file
///
/// Fetch the blob server-side and return it as a file download.
#[utoipa::path(
    get,
    path = "/api/attachments/file",
    params(
        ("case_id" = String, Query, description = "Case reference path segment"),
        ("document_type" = String, Query, description = "Document type path segment"),
        ("file_name" = String, Query, description = "File name")
    ),
    responses(
        (status = 200, description = "File bytes", content_type = "application/octet-stream"),
        (status = 403, description = "Storage denied access", body = AppError),
        (status = 404, description = "Blob not found", body = AppError),
        (status = 422, description = "Invalid path segment", body = AppError),
        (status = 502, description = "Storage failure", body = AppError)
    ),
    tag = "attachments"
)]
pub async fn download_attachment_file(
    State(storage): State<Arc<StorageService>>,
    Query(location): Query<BlobLocation>,
) -> Result<impl IntoResponse, AppError> {
    let file = storage.fetch(&location).await?;

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (header::CONTENT_DISPOSITION, content_disposition(&location.file_name)),
        ],
        file.bytes,
    ))
}

/// `attachment` disposition with an ASCII fallback name and an RFC 5987
/// `filename*` carrying the exact name.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}
