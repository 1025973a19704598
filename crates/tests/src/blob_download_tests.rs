//! The download orchestrator end to end: REST signing routes for auth, a real
//! HTTP GET against the mock blob store, and an in-memory sink.

use blob_download::{Downloader, ReqwestTransport};
use pretty_assertions::assert_eq;
use shared_types::{AttachmentRow, BlobLocation, DownloadErrorKind, DownloadMode, StorageEndpoint};

use crate::common::{
    storage_app, MemorySink, MockBlobStore, RestAuthBackend, ACCOUNT_KEY, OTHER_KEY, PDF_BYTES,
};

type TestDownloader = Downloader<RestAuthBackend, ReqwestTransport, MemorySink>;

/// Downloader whose auth comes from a server holding `server_key`.
fn downloader(endpoint: StorageEndpoint, server_key: &str) -> TestDownloader {
    let app = storage_app(endpoint.clone(), Some(server_key), DownloadMode::Signed);
    Downloader::new(
        endpoint,
        RestAuthBackend::new(app),
        ReqwestTransport::default(),
        MemorySink::default(),
    )
}

fn invoice_row() -> AttachmentRow {
    AttachmentRow::new("C1", "Invoice", "a.pdf")
}

#[tokio::test]
async fn downloads_signed_blob() {
    let store = MockBlobStore::start(vec![(
        BlobLocation::new("C1", "Invoice", "a.pdf"),
        PDF_BYTES.to_vec(),
        Some("application/pdf"),
    )])
    .await;
    let downloader = downloader(store.endpoint(), ACCOUNT_KEY);

    let receipt = downloader.download(&invoice_row()).await.unwrap();

    assert_eq!(receipt.file_name, "a.pdf");
    assert_eq!(receipt.content_type, "application/pdf");
    assert_eq!(receipt.size, 4);
    assert_eq!(
        downloader.sink().downloads(),
        vec![("a.pdf".to_string(), PDF_BYTES.to_vec(), "application/pdf".to_string())]
    );
    assert_eq!(downloader.sink().revoked().len(), 1);
    assert_eq!(downloader.auth_backend().calls(), vec!["timestamp", "signature"]);
    assert_eq!(store.requests(), 1);
}

#[tokio::test]
async fn special_characters_survive_signing() {
    let row = AttachmentRow::new("C 1", "Court Order", "ruling #2 (final).pdf");
    let store = MockBlobStore::start(vec![(row.location(), b"%PDF-1.7".to_vec(), None)]).await;
    let downloader = downloader(store.endpoint(), ACCOUNT_KEY);

    let receipt = downloader.download(&row).await.unwrap();

    assert_eq!(receipt.file_name, "ruling #2 (final).pdf");
    assert_eq!(receipt.content_type, "application/pdf");
    assert_eq!(downloader.sink().downloads()[0].1, b"%PDF-1.7".to_vec());
}

#[tokio::test]
async fn signature_mismatch_never_reaches_sink() {
    let store = MockBlobStore::start_with_key(
        OTHER_KEY,
        vec![(BlobLocation::new("C1", "Invoice", "a.pdf"), PDF_BYTES.to_vec(), None)],
    )
    .await;
    let downloader = downloader(store.endpoint(), ACCOUNT_KEY);

    let err = downloader.download(&invoice_row()).await.unwrap_err();

    assert_eq!(err.kind, DownloadErrorKind::AuthExpired);
    assert_eq!(err.status, Some(403));
    let message = err.to_string();
    assert!(message.contains("a.pdf"), "{message}");
    assert!(message.contains("403"), "{message}");
    assert!(downloader.sink().downloads().is_empty());
    assert!(downloader.sink().revoked().is_empty());
}

#[tokio::test]
async fn missing_blob_is_not_found_without_retry() {
    let store = MockBlobStore::start(vec![]).await;
    let downloader = downloader(store.endpoint(), ACCOUNT_KEY);

    let err = downloader.download(&invoice_row()).await.unwrap_err();

    assert_eq!(err.kind, DownloadErrorKind::NotFound);
    assert_eq!(err.status, Some(404));
    assert_eq!(err.detail, "BlobNotFound: The specified blob does not exist.");
    assert_eq!(store.requests(), 1);
}

#[tokio::test]
async fn unreachable_store_retries_once_with_fresh_auth() {
    let endpoint = StorageEndpoint::new(crate::common::ACCOUNT, crate::common::CONTAINER)
        .with_endpoint_url("http://127.0.0.1:1");
    let downloader = downloader(endpoint, ACCOUNT_KEY);

    let err = downloader.download(&invoice_row()).await.unwrap_err();

    assert_eq!(err.kind, DownloadErrorKind::TransientNetwork);
    assert_eq!(
        downloader.auth_backend().calls(),
        vec!["timestamp", "signature", "timestamp", "signature"]
    );
    assert!(downloader.sink().downloads().is_empty());
}

#[tokio::test]
async fn invalid_path_fails_at_signing() {
    let store = MockBlobStore::start(vec![]).await;
    let downloader = downloader(store.endpoint(), ACCOUNT_KEY);

    let err = downloader
        .download(&AttachmentRow::new("C1", "Invoice", "../a.pdf"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, DownloadErrorKind::BackendUnavailable);
    assert_eq!(store.requests(), 0);
}
