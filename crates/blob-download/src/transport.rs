use shared_types::{BlobLocation, StorageEndpoint, STORAGE_API_VERSION};

use crate::auth::AuthContext;
use crate::error::TransportError;

pub const HEADER_DATE: &str = "x-ms-date";
pub const HEADER_VERSION: &str = "x-ms-version";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// A signed GET against the blob store.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
}

impl BlobRequest {
    /// Build the request for `location`, consuming the signing pair.
    pub fn signed_get(endpoint: &StorageEndpoint, location: &BlobLocation, auth: AuthContext) -> Self {
        Self {
            url: endpoint.blob_url(location),
            headers: vec![
                (HEADER_DATE, auth.formatted_timestamp().to_string()),
                (HEADER_VERSION, STORAGE_API_VERSION.to_string()),
                (
                    HEADER_AUTHORIZATION,
                    endpoint.authorization_header(auth.shared_key()),
                ),
            ],
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What the blob store answered.
#[derive(Debug, Clone, PartialEq)]
pub enum BlobResponse {
    /// 2xx: raw file bytes plus the reported `Content-Type`, if any.
    Success {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
    /// Anything else: the body read as text, never as file content.
    Failure { status: u16, diagnostic: String },
}

/// HTTP client used to reach the blob store.
#[allow(async_fn_in_trait)]
pub trait BlobTransport {
    async fn get(&self, request: BlobRequest) -> Result<BlobResponse, TransportError>;
}

// ── reqwest implementation ──────────────────────────────────────────

/// Blob transport backed by `reqwest` (native HTTP or browser `fetch` on wasm).
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Client with a request timeout. Browsers manage their own timeouts, so
    /// wasm builds use the default client.
    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, TransportError> {
        #[cfg(not(target_arch = "wasm32"))]
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        #[cfg(target_arch = "wasm32")]
        let client = {
            let _ = timeout;
            reqwest::Client::new()
        };

        Ok(Self { client })
    }
}

impl BlobTransport for ReqwestTransport {
    async fn get(&self, request: BlobRequest) -> Result<BlobResponse, TransportError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.map_err(classify_reqwest_error)?;
        let status = response.status();

        if !status.is_success() {
            let diagnostic = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(status = status.as_u16(), error = %e, "Could not read blob error body");
                    String::new()
                }
            };
            return Ok(BlobResponse::Failure {
                status: status.as_u16(),
                diagnostic,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(BlobResponse::Success {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout;
    }
    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return TransportError::Connect(err.to_string());
    }
    if err.is_builder() {
        TransportError::Request(err.to_string())
    } else if err.is_body() || err.is_decode() {
        TransportError::Body(err.to_string())
    } else {
        TransportError::Connect(err.to_string())
    }
}
