//! SharedKey request signing for blob GETs.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use shared_types::{AppError, BlobLocation, StorageEndpoint, STORAGE_API_VERSION};

type HmacSha256 = Hmac<sha2::Sha256>;

/// Standard headers between the verb and the canonicalized headers, in
/// signing order. A body-less GET leaves every one empty.
const STANDARD_HEADERS: [&str; 11] = [
    "Content-Encoding",
    "Content-Language",
    "Content-Length",
    "Content-MD5",
    "Content-Type",
    "Date",
    "If-Modified-Since",
    "If-Match",
    "If-None-Match",
    "If-Unmodified-Since",
    "Range",
];

/// String-to-sign for a GET of `location` dated `timestamp`.
pub fn string_to_sign(endpoint: &StorageEndpoint, location: &BlobLocation, timestamp: &str) -> String {
    let mut out = String::from("GET\n");
    for _ in STANDARD_HEADERS {
        out.push('\n');
    }
    out.push_str(&format!("x-ms-date:{timestamp}\nx-ms-version:{STORAGE_API_VERSION}\n"));
    out.push_str(&endpoint.canonicalized_resource(location));
    out
}

/// Holds the decoded account key.
pub struct SharedKeySigner {
    key: Vec<u8>,
}

impl SharedKeySigner {
    /// Decode a base64 account key.
    pub fn from_base64(key: &str) -> Result<Self, AppError> {
        let key = STANDARD
            .decode(key.trim())
            .map_err(|_| AppError::internal("Storage key is not valid base64"))?;
        if key.is_empty() {
            return Err(AppError::internal("Storage key is empty"));
        }
        Ok(Self { key })
    }

    /// base64(HMAC-SHA256(key, string_to_sign)).
    pub fn sign(&self, string_to_sign: &str) -> String {
        // HMAC accepts keys of any length; new_from_slice cannot fail here.
        let mut mac = match HmacSha256::new_from_slice(&self.key) {
            Ok(mac) => mac,
            Err(_) => return String::new(),
        };
        mac.update(string_to_sign.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    pub fn sign_get(&self, endpoint: &StorageEndpoint, location: &BlobLocation, timestamp: &str) -> String {
        self.sign(&string_to_sign(endpoint, location, timestamp))
    }
}

impl fmt::Debug for SharedKeySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedKeySigner")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
