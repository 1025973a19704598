pub mod attachment;
pub mod storage;

use axum::{routing::{get, post}, Router};
use crate::db::AppState;

/// Build the REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Attachment metadata
        .route("/api/records/{record_id}/attachments", get(attachment::list_record_attachments))
        // Proxy download
        .route("/api/attachments/file", get(attachment::download_attachment_file))
        // Signing
        .route("/api/storage/timestamp", get(storage::get_timestamp))
        .route("/api/storage/signature", post(storage::create_signature))
        .route("/api/storage/settings", get(storage::get_settings))
}
