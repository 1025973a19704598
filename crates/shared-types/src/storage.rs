use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::BlobLocation;

/// Blob service REST version sent as `x-ms-version` and covered by the signature.
pub const STORAGE_API_VERSION: &str = "2021-08-06";

/// `x-ms-date` layout (RFC 1123, always GMT).
pub const STORAGE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Maximum clock skew, in either direction, the storage service accepts
/// between a signed timestamp and its own clock.
pub const MAX_TIMESTAMP_AGE_SECS: i64 = 15 * 60;

/// Format an instant the way the storage signing scheme expects.
pub fn format_storage_timestamp(at: DateTime<Utc>) -> String {
    at.format(STORAGE_DATE_FORMAT).to_string()
}

/// Parse an `x-ms-date` value. Returns `None` for anything not in
/// [`STORAGE_DATE_FORMAT`].
pub fn parse_storage_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), STORAGE_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Whether a timestamp is still usable for a signed request at `now`.
///
/// The storage service rejects timestamps more than the skew window behind
/// or ahead of its clock, so both directions are bounded.
pub fn is_timestamp_fresh(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(timestamp).abs() <= TimeDelta::seconds(MAX_TIMESTAMP_AGE_SECS)
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Storage account and container the attachments live in.
///
/// Deployment settings, never the signing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StorageEndpoint {
    pub account: String,
    pub container: String,
    /// Base URL override (e.g. Azurite or a test server). When unset the
    /// public `https://{account}.blob.core.windows.net` host is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

impl StorageEndpoint {
    pub fn new(account: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            container: container.into(),
            endpoint_url: None,
        }
    }

    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Service base URL without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.endpoint_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.blob.core.windows.net", self.account),
        }
    }

    /// Full URL of the blob at `location`.
    pub fn blob_url(&self, location: &BlobLocation) -> String {
        format!(
            "{}/{}/{}",
            self.base_url(),
            self.container,
            location.encoded_path()
        )
    }

    /// Canonicalized resource for SharedKey signing: `/{account}/{container}/{path}`.
    pub fn canonicalized_resource(&self, location: &BlobLocation) -> String {
        format!(
            "/{}/{}/{}",
            self.account,
            self.container,
            location.encoded_path()
        )
    }

    /// Value of the `Authorization` header for a given signature.
    pub fn authorization_header(&self, signature: &str) -> String {
        format!("SharedKey {}:{}", self.account, signature)
    }
}

// ---------------------------------------------------------------------------
// Download settings
// ---------------------------------------------------------------------------

/// How the client obtains file bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    /// Client fetches a timestamp and signature, then GETs the blob itself.
    #[default]
    Signed,
    /// Server fetches the blob and returns it base64 encoded.
    Proxy,
}

/// Settings the client needs to run a download. Contains no secrets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DownloadSettings {
    pub storage: StorageEndpoint,
    pub mode: DownloadMode,
}

// ---------------------------------------------------------------------------
// Signing DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimestampResponse {
    pub timestamp: String,
}

/// Request for a SharedKey signature over a blob GET dated `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SignatureRequest {
    pub case_id: String,
    pub document_type: String,
    pub file_name: String,
    pub timestamp: String,
}

impl SignatureRequest {
    pub fn location(&self) -> BlobLocation {
        BlobLocation::new(&self.case_id, &self.document_type, &self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SignatureResponse {
    pub signature: String,
}

/// A blob fetched by the server: base64 bytes plus the content type the
/// store reported (already resolved against the file extension).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePayload {
    pub data: String,
    pub content_type: String,
}
