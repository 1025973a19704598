use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use shared_types::{DownloadMode, StorageEndpoint};

use crate::common::{get_json, storage_app, ACCOUNT, ACCOUNT_KEY, CONTAINER};

#[tokio::test]
async fn settings_report_endpoint_and_mode() {
    let app = storage_app(
        StorageEndpoint::new(ACCOUNT, CONTAINER),
        Some(ACCOUNT_KEY),
        DownloadMode::Proxy,
    );

    let (status, body) = get_json(&app, "/api/storage/settings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "storage": { "account": ACCOUNT, "container": CONTAINER },
            "mode": "proxy",
        })
    );
}

#[tokio::test]
async fn settings_never_expose_key() {
    let app = storage_app(
        StorageEndpoint::new(ACCOUNT, CONTAINER).with_endpoint_url("http://127.0.0.1:10000"),
        Some(ACCOUNT_KEY),
        DownloadMode::Signed,
    );

    let (status, body) = get_json(&app, "/api/storage/settings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"]["endpoint_url"], "http://127.0.0.1:10000");
    assert_eq!(body["mode"], "signed");
    assert!(!body.to_string().contains(ACCOUNT_KEY));
}

#[tokio::test]
async fn api_docs_list_storage_routes() {
    let app = storage_app(StorageEndpoint::new(ACCOUNT, CONTAINER), None, DownloadMode::Signed);

    let (status, _) = get_json(&app, "/docs").await;
    assert_eq!(status, StatusCode::OK);

    let spec = serde_json::to_value(<server::openapi::ApiDoc as utoipa::OpenApi>::openapi())
        .expect("OpenAPI document serializes");
    for path in [
        "/api/records/{record_id}/attachments",
        "/api/attachments/file",
        "/api/storage/timestamp",
        "/api/storage/signature",
        "/api/storage/settings",
        "/health",
    ] {
        assert!(spec["paths"].get(path).is_some(), "missing {path}");
    }
}
