use std::fmt;

use shared_types::{AppError, AppErrorKind, DownloadErrorKind};
use thiserror::Error;

/// Longest diagnostic text carried into a user-facing message.
const MAX_DIAGNOSTIC_CHARS: usize = 300;

/// Failure below the HTTP status line: the blob request never produced a
/// complete response.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// DNS, TCP, TLS or browser fetch failure.
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    /// The response started but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The request could not be built (bad URL or header value).
    #[error("invalid request: {0}")]
    Request(String),
}

impl TransportError {
    pub fn kind(&self) -> DownloadErrorKind {
        match self {
            TransportError::Connect(_) | TransportError::Timeout | TransportError::Body(_) => {
                DownloadErrorKind::TransientNetwork
            }
            TransportError::Request(_) => DownloadErrorKind::Unknown,
        }
    }
}

/// Failure of a backend call (timestamp, signature, file bytes).
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct BackendError {
    pub kind: DownloadErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: DownloadErrorKind::BackendUnavailable,
            message: message.into(),
        }
    }

    /// Map a structured server error onto the download taxonomy.
    pub fn from_app_error(err: &AppError) -> Self {
        let kind = match err.kind {
            AppErrorKind::NotFound => DownloadErrorKind::NotFound,
            AppErrorKind::Forbidden | AppErrorKind::Unauthorized => DownloadErrorKind::AuthExpired,
            AppErrorKind::Upstream => DownloadErrorKind::Unknown,
            _ => DownloadErrorKind::BackendUnavailable,
        };
        Self {
            kind,
            message: err.message.clone(),
        }
    }

    /// Interpret a `ServerFnError` string. Structured `AppError` payloads keep
    /// their kind; anything else means the backend could not be reached.
    pub fn from_server_message(message: &str) -> Self {
        match AppError::from_server_error(message) {
            Some(err) => Self::from_app_error(&err),
            None => Self::unavailable(message),
        }
    }
}

/// A failed download, ready to be shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadError {
    pub kind: DownloadErrorKind,
    pub file_name: String,
    /// HTTP status from the blob store, when one was received.
    pub status: Option<u16>,
    pub detail: String,
}

impl DownloadError {
    pub fn new(kind: DownloadErrorKind, file_name: &str, detail: impl Into<String>) -> Self {
        Self {
            kind,
            file_name: file_name.to_string(),
            status: None,
            detail: detail.into(),
        }
    }

    /// Non-success response from the blob store; `diagnostic` is the body read as text.
    pub fn from_status(file_name: &str, status: u16, diagnostic: &str) -> Self {
        Self {
            kind: DownloadErrorKind::from_status(status),
            file_name: file_name.to_string(),
            status: Some(status),
            detail: summarize_diagnostic(diagnostic),
        }
    }

    pub fn from_transport(file_name: &str, err: &TransportError) -> Self {
        Self::new(err.kind(), file_name, err.to_string())
    }

    pub fn from_backend(file_name: &str, err: BackendError) -> Self {
        Self::new(err.kind, file_name, err.message)
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not download {}: {} ({}",
            self.file_name,
            self.kind.describe(),
            self.kind
        )?;
        if let Some(status) = self.status {
            write!(f, ", HTTP {status}")?;
        }
        write!(f, ")")?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for DownloadError {}

/// Reduce a storage error body to one line.
///
/// Storage errors are XML (`<Error><Code>..</Code><Message>..</Message></Error>`);
/// when that shape is present the code and first message line are kept.
pub fn summarize_diagnostic(body: &str) -> String {
    let code = xml_element(body, "Code");
    let message = xml_element(body, "Message").map(|m| m.lines().next().unwrap_or("").trim());

    let summary = match (code, message) {
        (Some(code), Some(message)) if !message.is_empty() => format!("{code}: {message}"),
        (Some(code), _) => code.to_string(),
        _ => body.split_whitespace().collect::<Vec<_>>().join(" "),
    };

    if summary.chars().count() > MAX_DIAGNOSTIC_CHARS {
        let truncated: String = summary.chars().take(MAX_DIAGNOSTIC_CHARS).collect();
        format!("{truncated}…")
    } else {
        summary
    }
}

fn xml_element<'a>(body: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = body.find(&open)? + open.len();
    let end = body[start..].find(&close)? + start;
    Some(body[start..end].trim())
}
