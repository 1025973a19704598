use base64::Engine;
use shared_types::{
    resolve_content_type, AttachmentRow, BlobLocation, DownloadErrorKind, FilePayload,
};
use tracing::info;

use crate::error::{BackendError, DownloadError};
use crate::orchestrator::DownloadReceipt;
use crate::sink::{self, DownloadSink};

/// Backend that fetches the blob on the user's behalf and returns it
/// base64-encoded, so no signing material reaches the client.
#[allow(async_fn_in_trait)]
pub trait FileBackend {
    async fn file_bytes(&self, location: &BlobLocation) -> Result<FilePayload, BackendError>;
}

/// Decoded proxy payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxiedFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Download path used when the deployment runs in proxy mode.
pub struct ProxyDownloader<F, S> {
    files: F,
    sink: S,
}

impl<F: FileBackend, S: DownloadSink> ProxyDownloader<F, S> {
    pub fn new(files: F, sink: S) -> Self {
        Self { files, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Fetch and decode the file. A blank or generic content type from the
    /// server falls back to the file extension.
    pub async fn fetch_file(&self, location: &BlobLocation) -> Result<ProxiedFile, DownloadError> {
        let file_name = location.file_name.as_str();
        let payload = self
            .files
            .file_bytes(location)
            .await
            .map_err(|e| DownloadError::from_backend(file_name, e))?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.data.trim())
            .map_err(|e| {
                DownloadError::new(
                    DownloadErrorKind::BackendUnavailable,
                    file_name,
                    format!("server returned malformed file data: {e}"),
                )
            })?;

        Ok(ProxiedFile {
            bytes,
            content_type: resolve_content_type(Some(payload.content_type.as_str()), file_name),
        })
    }

    #[tracing::instrument(skip(self, row), fields(case = %row.case_reference, file = %row.file_name))]
    pub async fn download(&self, row: &AttachmentRow) -> Result<DownloadReceipt, DownloadError> {
        let file = self.fetch_file(&row.location()).await?;

        sink::trigger_download(&self.sink, &file.bytes, &row.file_name, &file.content_type)
            .await
            .map_err(|e| DownloadError::new(DownloadErrorKind::Unknown, &row.file_name, e.0))?;

        info!(size = file.bytes.len(), content_type = %file.content_type, "Attachment downloaded through proxy");
        Ok(DownloadReceipt {
            file_name: row.file_name.clone(),
            content_type: file.content_type,
            size: file.bytes.len(),
        })
    }
}
