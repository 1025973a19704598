pub mod error;
pub mod config;

// Attachment listing and download
pub mod attachment;
pub mod content_type;
pub mod download;
pub mod storage;

pub use error::*;
pub use config::*;

pub use attachment::*;
pub use content_type::*;
pub use download::*;
pub use storage::*;
