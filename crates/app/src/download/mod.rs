//! Client-side wiring for attachment downloads.
//!
//! Server functions stand in for the auth and file backends; the browser
//! provides the download sink. Which path runs is decided once per page from
//! the deployment's [`DownloadSettings`].

mod browser;

use std::rc::Rc;

use blob_download::{
    AuthBackend, BackendError, DownloadError, DownloadReceipt, Downloader, FileBackend,
    ProxyDownloader, ReqwestTransport,
};
use dioxus::prelude::ServerFnError;
use shared_types::{AttachmentRow, BlobLocation, DownloadMode, DownloadSettings, FilePayload};

pub use browser::BrowserSink;

fn backend_error(err: ServerFnError) -> BackendError {
    BackendError::from_server_message(&err.to_string())
}

/// Timestamp and signature from the server functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerAuthBackend;

impl AuthBackend for ServerAuthBackend {
    async fn formatted_timestamp(&self) -> Result<String, BackendError> {
        server::api::get_formatted_timestamp()
            .await
            .map_err(backend_error)
    }

    async fn auth_signature(
        &self,
        location: &BlobLocation,
        timestamp: &str,
    ) -> Result<String, BackendError> {
        server::api::get_auth_signature(
            location.case_id.clone(),
            location.document_type.clone(),
            location.file_name.clone(),
            timestamp.to_string(),
        )
        .await
        .map_err(backend_error)
    }
}

/// File bytes and content type fetched by the server on the caller's behalf.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerFileBackend;

impl FileBackend for ServerFileBackend {
    async fn file_bytes(&self, location: &BlobLocation) -> Result<FilePayload, BackendError> {
        server::api::get_file_bytes(
            location.case_id.clone(),
            location.document_type.clone(),
            location.file_name.clone(),
        )
        .await
        .map_err(backend_error)
    }
}

enum Strategy {
    Signed(Downloader<ServerAuthBackend, ReqwestTransport, BrowserSink>),
    Proxy(ProxyDownloader<ServerFileBackend, BrowserSink>),
}

/// Shared handle to the download path chosen for this deployment.
///
/// Rows hold clones; all state a download needs lives in the call itself,
/// so concurrent downloads through one handle never interfere.
#[derive(Clone)]
pub struct AttachmentDownloader {
    mode: DownloadMode,
    strategy: Rc<Strategy>,
}

impl AttachmentDownloader {
    pub fn from_settings(settings: &DownloadSettings) -> Self {
        let strategy = match settings.mode {
            DownloadMode::Signed => Strategy::Signed(Downloader::new(
                settings.storage.clone(),
                ServerAuthBackend,
                ReqwestTransport::default(),
                BrowserSink,
            )),
            DownloadMode::Proxy => {
                Strategy::Proxy(ProxyDownloader::new(ServerFileBackend, BrowserSink))
            }
        };
        Self {
            mode: settings.mode,
            strategy: Rc::new(strategy),
        }
    }

    pub fn mode(&self) -> DownloadMode {
        self.mode
    }

    pub async fn download(&self, row: &AttachmentRow) -> Result<DownloadReceipt, DownloadError> {
        match self.strategy.as_ref() {
            Strategy::Signed(downloader) => downloader.download(row).await,
            Strategy::Proxy(downloader) => downloader.download(row).await,
        }
    }
}

impl PartialEq for AttachmentDownloader {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.strategy, &other.strategy)
    }
}
