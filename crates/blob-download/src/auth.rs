use std::fmt;

use chrono::{DateTime, Utc};
use shared_types::{is_timestamp_fresh, parse_storage_timestamp, BlobLocation};

use crate::error::BackendError;

/// Signing parameters for exactly one blob request.
///
/// The signature is only valid together with the timestamp it was computed
/// from, so the pair travels as one value. It is deliberately not `Clone`:
/// building a request consumes it.
pub struct AuthContext {
    formatted_timestamp: String,
    shared_key: String,
}

impl AuthContext {
    pub fn new(formatted_timestamp: impl Into<String>, shared_key: impl Into<String>) -> Self {
        Self {
            formatted_timestamp: formatted_timestamp.into(),
            shared_key: shared_key.into(),
        }
    }

    /// Value of the `x-ms-date` header.
    pub fn formatted_timestamp(&self) -> &str {
        &self.formatted_timestamp
    }

    /// Base64 signature placed after `SharedKey {account}:`.
    pub fn shared_key(&self) -> &str {
        &self.shared_key
    }

    /// Whether the pair may still be sent at `now`. A timestamp that does not
    /// parse is never fresh.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        parse_storage_timestamp(&self.formatted_timestamp)
            .map(|issued| is_timestamp_fresh(issued, now))
            .unwrap_or(false)
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("formatted_timestamp", &self.formatted_timestamp)
            .field("shared_key", &"[REDACTED]")
            .finish()
    }
}

/// Server-side collaborator that hands out signing parameters.
///
/// The two calls are dependent: the signature is computed over the exact
/// timestamp returned by the first call.
#[allow(async_fn_in_trait)]
pub trait AuthBackend {
    /// Current time formatted for `x-ms-date`.
    async fn formatted_timestamp(&self) -> Result<String, BackendError>;

    /// SharedKey signature for a GET of `location` dated `timestamp`.
    async fn auth_signature(
        &self,
        location: &BlobLocation,
        timestamp: &str,
    ) -> Result<String, BackendError>;
}
