use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a download attempt failed. Every kind is recoverable by retrying the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum DownloadErrorKind {
    /// A backend call failed, timed out or returned malformed data.
    BackendUnavailable,
    /// The storage service rejected the signature, or the signature was stale.
    AuthExpired,
    /// The blob does not exist.
    NotFound,
    /// Connection-level failure talking to the blob store.
    TransientNetwork,
    /// Any other failure, including the browser refusing the download.
    Unknown,
}

impl DownloadErrorKind {
    /// Classify a non-success HTTP status from the blob store. A response was
    /// received, so no status is ever `TransientNetwork`.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => DownloadErrorKind::AuthExpired,
            404 => DownloadErrorKind::NotFound,
            _ => DownloadErrorKind::Unknown,
        }
    }

    /// Whether a single fresh retry is worthwhile.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DownloadErrorKind::TransientNetwork)
    }

    /// Short phrase for user-facing messages.
    pub fn describe(&self) -> &'static str {
        match self {
            DownloadErrorKind::BackendUnavailable => "the server could not be reached",
            DownloadErrorKind::AuthExpired => "storage access was denied",
            DownloadErrorKind::NotFound => "the file was not found in storage",
            DownloadErrorKind::TransientNetwork => "the network connection failed",
            DownloadErrorKind::Unknown => "an unexpected error occurred",
        }
    }
}

impl fmt::Display for DownloadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadErrorKind::BackendUnavailable => write!(f, "BackendUnavailable"),
            DownloadErrorKind::AuthExpired => write!(f, "AuthExpired"),
            DownloadErrorKind::NotFound => write!(f, "NotFound"),
            DownloadErrorKind::TransientNetwork => write!(f, "TransientNetwork"),
            DownloadErrorKind::Unknown => write!(f, "Unknown"),
        }
    }
}
