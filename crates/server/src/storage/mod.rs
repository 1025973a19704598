use std::time::Duration;

use blob_download::{summarize_diagnostic, AuthContext, BlobRequest, BlobResponse, BlobTransport, ReqwestTransport};
use chrono::{DateTime, Utc};
use shared_types::{
    format_storage_timestamp, is_timestamp_fresh, parse_storage_timestamp, resolve_content_type,
    AppError, BlobLocation, DownloadMode, DownloadSettings, StorageEndpoint,
};

use crate::error_convert::ValidateRequest;
use crate::signing::SharedKeySigner;

/// Timeout for server-side blob fetches.
const FETCH_TIMEOUT_SECS: u64 = 30;

/// A blob fetched on the caller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Timestamps, signatures and proxy fetches against the attachments container.
///
/// Owns the account key; nothing it returns contains it.
#[derive(Debug)]
pub struct StorageService {
    endpoint: StorageEndpoint,
    signer: Option<SharedKeySigner>,
    transport: ReqwestTransport,
    mode: DownloadMode,
    clock: fn() -> DateTime<Utc>,
}

impl StorageService {
    pub fn new(endpoint: StorageEndpoint, signer: Option<SharedKeySigner>) -> Self {
        Self {
            endpoint,
            signer,
            transport: ReqwestTransport::default(),
            mode: DownloadMode::default(),
            clock: Utc::now,
        }
    }

    /// Build from `config.toml` and the environment.
    pub fn from_config() -> Self {
        let endpoint = crate::config::storage_endpoint();
        let signer = match crate::config::storage_key() {
            Some(key) => match SharedKeySigner::from_base64(&key) {
                Ok(signer) => Some(signer),
                Err(e) => {
                    tracing::error!(error = %e, "Storage key rejected; signing disabled");
                    None
                }
            },
            None => {
                tracing::warn!("AZURE_STORAGE_KEY not set; signing disabled");
                None
            }
        };

        let transport = ReqwestTransport::with_timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                ReqwestTransport::default()
            });

        Self {
            transport,
            mode: crate::config::app_config().download.mode,
            ..Self::new(endpoint, signer)
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: DownloadMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }

    pub fn endpoint(&self) -> &StorageEndpoint {
        &self.endpoint
    }

    pub fn settings(&self) -> DownloadSettings {
        DownloadSettings {
            storage: self.endpoint.clone(),
            mode: self.mode,
        }
    }

    /// Current time formatted for `x-ms-date`.
    pub fn formatted_timestamp(&self) -> String {
        format_storage_timestamp((self.clock)())
    }

    /// SharedKey signature for a GET of `location` dated `timestamp`.
    ///
    /// Refuses timestamps that do not parse or are already outside the
    /// storage service's acceptance window.
    pub fn sign(&self, location: &BlobLocation, timestamp: &str) -> Result<String, AppError> {
        location.validate_request()?;

        let issued = parse_storage_timestamp(timestamp).ok_or_else(|| {
            AppError::forbidden(format!("Timestamp '{timestamp}' is not a valid x-ms-date value"))
        })?;
        if !is_timestamp_fresh(issued, (self.clock)()) {
            return Err(AppError::forbidden("Timestamp outside signing window"));
        }

        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| AppError::internal("Storage signing is not configured"))?;

        Ok(signer.sign_get(&self.endpoint, location, timestamp))
    }

    /// Fetch the blob server-side with a freshly signed request.
    #[tracing::instrument(skip(self), fields(case = %location.case_id, file = %location.file_name))]
    pub async fn fetch(&self, location: &BlobLocation) -> Result<FetchedFile, AppError> {
        let timestamp = self.formatted_timestamp();
        let signature = self.sign(location, &timestamp)?;
        let request = BlobRequest::signed_get(
            &self.endpoint,
            location,
            AuthContext::new(timestamp, signature),
        );

        match self.transport.get(request).await {
            Ok(BlobResponse::Success {
                bytes,
                content_type,
            }) => Ok(FetchedFile {
                content_type: resolve_content_type(content_type.as_deref(), &location.file_name),
                bytes,
            }),
            Ok(BlobResponse::Failure { status, diagnostic }) => {
                tracing::warn!(status, "Blob store refused proxy fetch");
                Err(blob_failure(location, status, &diagnostic))
            }
            Err(e) => Err(AppError::upstream(format!("Storage request failed: {e}"))),
        }
    }
}

/// Map a non-success blob response onto an `AppError`.
pub fn blob_failure(location: &BlobLocation, status: u16, diagnostic: &str) -> AppError {
    let path = format!(
        "{}/{}/{}",
        location.case_id, location.document_type, location.file_name
    );
    match status {
        404 => AppError::not_found(format!("Blob {path} not found")),
        401 | 403 => AppError::forbidden(format!(
            "Storage denied access to {path}: {}",
            summarize_diagnostic(diagnostic)
        )),
        _ => AppError::upstream(format!(
            "Storage returned HTTP {status} for {path}: {}",
            summarize_diagnostic(diagnostic)
        )),
    }
}
