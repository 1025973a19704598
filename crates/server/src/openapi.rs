use axum::Router;
use shared_types::{
    AppError, AppErrorKind, AttachmentRow, BlobLocation, DownloadErrorKind, DownloadMode,
    DownloadSettings, SignatureRequest, SignatureResponse, StorageEndpoint, TimestampResponse,
};
use sqlx::{Pool, Postgres};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health::{self, HealthResponse};
use crate::rest;
use crate::storage::StorageService;

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::attachment::list_record_attachments,
        rest::attachment::download_attachment_file,
        rest::storage::get_timestamp,
        rest::storage::create_signature,
        rest::storage::get_settings,
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind, AttachmentRow, BlobLocation, DownloadErrorKind, DownloadMode,
        DownloadSettings, SignatureRequest, SignatureResponse, StorageEndpoint,
        TimestampResponse, HealthResponse,
    )),
    tags(
        (name = "attachments", description = "Attachment listing and proxy downloads"),
        (name = "storage", description = "Blob request signing"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Case Attachments API",
        description = "Attachment listing and signed blob downloads",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build an Axum router that serves the API docs at `/docs`
/// and the REST API at `/api/*`.
pub fn api_router(pool: Pool<Postgres>) -> Router {
    router_with_state(AppState::new(pool, StorageService::from_config()))
}

/// Same routes over a caller-supplied state.
pub fn router_with_state(state: AppState) -> Router {
    Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}
