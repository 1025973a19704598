//! Signed blob downloads for attachment rows.
//!
//! A download is three dependent steps: obtain a timestamp and a signature
//! over it from the server, GET the blob with that pair, then hand the bytes
//! to the user. [`Downloader`] runs them in order for one row and keeps no
//! state between rows. [`ProxyDownloader`] covers deployments where the
//! server fetches the blob itself.

pub mod auth;
pub mod error;
pub mod orchestrator;
pub mod proxy;
pub mod sink;
pub mod transport;

pub use auth::{AuthBackend, AuthContext};
pub use error::{summarize_diagnostic, BackendError, DownloadError, TransportError};
pub use orchestrator::{Clock, DownloadReceipt, Downloader, FetchedBlob};
pub use proxy::{FileBackend, ProxiedFile, ProxyDownloader};
pub use sink::{trigger_download, DownloadSink, ObjectUrl, SinkError};
pub use transport::{BlobRequest, BlobResponse, BlobTransport, ReqwestTransport};
