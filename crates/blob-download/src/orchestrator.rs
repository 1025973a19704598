use chrono::{DateTime, Utc};
use shared_types::{
    resolve_content_type, AttachmentRow, BlobLocation, DownloadErrorKind, StorageEndpoint,
};
use tracing::{info, warn};

use crate::auth::{AuthBackend, AuthContext};
use crate::error::DownloadError;
use crate::sink::{self, DownloadSink};
use crate::transport::{BlobRequest, BlobResponse, BlobTransport};

/// Source of "now" for the freshness check on signing pairs.
pub type Clock = fn() -> DateTime<Utc>;

/// Bytes returned by a successful blob GET.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedBlob {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Summary of a download handed to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadReceipt {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

/// Runs the signed-GET download for one attachment row at a time.
///
/// Holds no per-download state: every call gets its own [`AuthContext`], so
/// any number of downloads can be in flight on the same instance.
pub struct Downloader<A, T, S> {
    endpoint: StorageEndpoint,
    auth: A,
    transport: T,
    sink: S,
    clock: Clock,
}

impl<A, T, S> Downloader<A, T, S>
where
    A: AuthBackend,
    T: BlobTransport,
    S: DownloadSink,
{
    pub fn new(endpoint: StorageEndpoint, auth: A, transport: T, sink: S) -> Self {
        Self {
            endpoint,
            auth,
            transport,
            sink,
            clock: Utc::now,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn endpoint(&self) -> &StorageEndpoint {
        &self.endpoint
    }

    pub fn auth_backend(&self) -> &A {
        &self.auth
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Obtain a timestamp, then the signature computed over that exact timestamp.
    #[tracing::instrument(skip(self), fields(file = %location.file_name))]
    pub async fn request_auth(&self, location: &BlobLocation) -> Result<AuthContext, DownloadError> {
        let file_name = location.file_name.as_str();

        let timestamp = self
            .auth
            .formatted_timestamp()
            .await
            .map_err(|e| DownloadError::from_backend(file_name, e))?;
        if timestamp.trim().is_empty() {
            return Err(DownloadError::new(
                DownloadErrorKind::BackendUnavailable,
                file_name,
                "server returned an empty timestamp",
            ));
        }

        let signature = self
            .auth
            .auth_signature(location, &timestamp)
            .await
            .map_err(|e| DownloadError::from_backend(file_name, e))?;
        if signature.trim().is_empty() {
            return Err(DownloadError::new(
                DownloadErrorKind::BackendUnavailable,
                file_name,
                "server returned an empty signature",
            ));
        }

        Ok(AuthContext::new(timestamp, signature))
    }

    /// GET the blob with the given signing pair. Non-success responses come
    /// back as errors carrying the body text; they never yield bytes.
    #[tracing::instrument(skip(self, auth), fields(file = %location.file_name))]
    pub async fn fetch_blob(
        &self,
        location: &BlobLocation,
        auth: AuthContext,
    ) -> Result<FetchedBlob, DownloadError> {
        let file_name = location.file_name.as_str();

        if !auth.is_fresh_at((self.clock)()) {
            return Err(DownloadError::new(
                DownloadErrorKind::AuthExpired,
                file_name,
                format!(
                    "signing timestamp '{}' is outside the accepted window",
                    auth.formatted_timestamp()
                ),
            ));
        }

        let request = BlobRequest::signed_get(&self.endpoint, location, auth);
        match self.transport.get(request).await {
            Ok(BlobResponse::Success {
                bytes,
                content_type,
            }) => Ok(FetchedBlob {
                bytes,
                content_type,
            }),
            Ok(BlobResponse::Failure { status, diagnostic }) => {
                Err(DownloadError::from_status(file_name, status, &diagnostic))
            }
            Err(e) => Err(DownloadError::from_transport(file_name, &e)),
        }
    }

    /// Offer the bytes to the user as `file_name`.
    pub async fn trigger_download(
        &self,
        bytes: &[u8],
        file_name: &str,
        content_type: &str,
    ) -> Result<(), DownloadError> {
        sink::trigger_download(&self.sink, bytes, file_name, content_type)
            .await
            .map_err(|e| DownloadError::new(DownloadErrorKind::Unknown, file_name, e.0))
    }

    async fn authorize_and_fetch(&self, location: &BlobLocation) -> Result<FetchedBlob, DownloadError> {
        let auth = self.request_auth(location).await?;
        self.fetch_blob(location, auth).await
    }

    /// Full row action: sign, fetch, hand to the user.
    ///
    /// A transient network failure is retried once with a new signing pair.
    #[tracing::instrument(skip(self, row), fields(case = %row.case_reference, file = %row.file_name))]
    pub async fn download(&self, row: &AttachmentRow) -> Result<DownloadReceipt, DownloadError> {
        let location = row.location();

        let blob = match self.authorize_and_fetch(&location).await {
            Err(err) if err.is_retryable() => {
                warn!(error = %err, "Transient blob failure, retrying with a fresh signature");
                self.authorize_and_fetch(&location).await?
            }
            other => other?,
        };

        let content_type = resolve_content_type(blob.content_type.as_deref(), &row.file_name);
        self.trigger_download(&blob.bytes, &row.file_name, &content_type)
            .await?;

        info!(size = blob.bytes.len(), content_type = %content_type, "Attachment downloaded");
        Ok(DownloadReceipt {
            file_name: row.file_name.clone(),
            content_type,
            size: blob.bytes.len(),
        })
    }
}
