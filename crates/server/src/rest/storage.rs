use axum::{extract::State, Json};
use std::sync::Arc;

use shared_types::{
    AppError, DownloadSettings, SignatureRequest, SignatureResponse, TimestampResponse,
};
use crate::storage::StorageService;

/// GET /api/storage/timestamp
///
/// Current time formatted for the `x-ms-date` header.
#[utoipa::path(
    get,
    path = "/api/storage/timestamp",
    responses(
        (status = 200, description = "Signing timestamp", body = TimestampResponse)
    ),
    tag = "storage"
)]
pub async fn get_timestamp(State(storage): State<Arc<StorageService>>) -> Json<TimestampResponse> {
    Json(TimestampResponse {
        timestamp: storage.formatted_timestamp(),
    })
}

/// POST /api/storage/signature
///
/// SharedKey signature for a GET of one blob at the given timestamp.
#[utoipa::path(
    post,
    path = "/api/storage/signature",
    request_body = SignatureRequest,
    responses(
        (status = 200, description = "Signature", body = SignatureResponse),
        (status = 403, description = "Timestamp invalid or outside the signing window", body = AppError),
        (status = 422, description = "Invalid path segment", body = AppError),
        (status = 500, description = "Signing not configured", body = AppError)
    ),
    tag = "storage"
)]
pub async fn create_signature(
    State(storage): State<Arc<StorageService>>,
    Json(body): Json<SignatureRequest>,
) -> Result<Json<SignatureResponse>, AppError> {
    let signature = storage.sign(&body.location(), &body.timestamp)?;
    Ok(Json(SignatureResponse { signature }))
}

/// GET /api/storage/settings
///
/// Storage endpoint and download mode. Never includes the account key.
#[utoipa::path(
    get,
    path = "/api/storage/settings",
    responses(
        (status = 200, description = "Download settings", body = DownloadSettings)
    ),
    tag = "storage"
)]
pub async fn get_settings(State(storage): State<Arc<StorageService>>) -> Json<DownloadSettings> {
    Json(storage.settings())
}
