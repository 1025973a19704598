use axum::{body::Body, http::{Request, StatusCode}};
use pretty_assertions::assert_eq;
use shared_types::{BlobLocation, DownloadMode};

use crate::common::{
    file_query, get_json, send_raw, storage_app, MockBlobStore, ACCOUNT_KEY, OTHER_KEY, PDF_BYTES,
};

fn invoice() -> BlobLocation {
    BlobLocation::new("C1", "Invoice", "a.pdf")
}

async fn get_file(app: &axum::Router, location: &BlobLocation) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let req = Request::builder()
        .method("GET")
        .uri(file_query(location))
        .body(Body::empty())
        .unwrap();
    send_raw(app, req).await
}

#[tokio::test]
async fn proxies_blob_bytes_with_headers() {
    let store = MockBlobStore::start(vec![(invoice(), PDF_BYTES.to_vec(), Some("application/pdf"))]).await;
    let app = storage_app(store.endpoint(), Some(ACCOUNT_KEY), DownloadMode::Proxy);

    let (status, headers, body) = get_file(&app, &invoice()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, PDF_BYTES);
    assert_eq!(headers["content-type"], "application/pdf");
    let disposition = headers["content-disposition"].to_str().unwrap();
    assert!(disposition.starts_with("attachment;"), "{disposition}");
    assert!(disposition.contains("a.pdf"), "{disposition}");
    assert_eq!(store.requests(), 1);
}

#[tokio::test]
async fn content_type_falls_back_to_extension() {
    let location = BlobLocation::new("C1", "Scan", "page 1.png");
    let store = MockBlobStore::start(vec![(location.clone(), vec![0x89, 0x50, 0x4e, 0x47], None)]).await;
    let app = storage_app(store.endpoint(), Some(ACCOUNT_KEY), DownloadMode::Proxy);

    let (status, headers, _) = get_file(&app, &location).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "image/png");
}

#[tokio::test]
async fn missing_blob_is_not_found() {
    let store = MockBlobStore::start(vec![]).await;
    let app = storage_app(store.endpoint(), Some(ACCOUNT_KEY), DownloadMode::Proxy);

    let (status, body) = get_json(&app, &file_query(&invoice())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFound");
    assert!(body["message"].as_str().unwrap().contains("C1/Invoice/a.pdf"));
}

#[tokio::test]
async fn rejected_signature_is_forbidden() {
    let store =
        MockBlobStore::start_with_key(OTHER_KEY, vec![(invoice(), PDF_BYTES.to_vec(), None)]).await;
    let app = storage_app(store.endpoint(), Some(ACCOUNT_KEY), DownloadMode::Proxy);

    let (status, body) = get_json(&app, &file_query(&invoice())).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    let msg = body["message"].as_str().unwrap_or_default();
    assert!(msg.contains("AuthenticationFailed"), "{msg}");
}

#[tokio::test]
async fn traversal_never_reaches_store() {
    let store = MockBlobStore::start(vec![]).await;
    let app = storage_app(store.endpoint(), Some(ACCOUNT_KEY), DownloadMode::Proxy);

    let (status, _) =
        get_json(&app, &file_query(&BlobLocation::new("C1", "..", "a.pdf"))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store.requests(), 0);
}

#[tokio::test]
async fn unreachable_store_is_bad_gateway() {
    let endpoint = shared_types::StorageEndpoint::new(crate::common::ACCOUNT, crate::common::CONTAINER)
        .with_endpoint_url("http://127.0.0.1:1");
    let app = storage_app(endpoint, Some(ACCOUNT_KEY), DownloadMode::Proxy);

    let (status, body) = get_json(&app, &file_query(&invoice())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "Upstream");
}
