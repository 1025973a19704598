use thiserror::Error;

/// The browser-side bridge refused an operation.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{0}")]
pub struct SinkError(pub String);

/// Hands downloaded bytes to the user as a file.
///
/// Implementations wrap `URL.createObjectURL` / an anchor click /
/// `URL.revokeObjectURL`, or an equivalent on non-browser targets.
#[allow(async_fn_in_trait)]
pub trait DownloadSink {
    /// Register the bytes and return a temporary URL for them.
    async fn create_object_url(&self, bytes: &[u8], content_type: &str) -> Result<String, SinkError>;

    /// Start a download of `url`, saved as `file_name`.
    async fn click_download(&self, url: &str, file_name: &str) -> Result<(), SinkError>;

    /// Release a URL returned by [`create_object_url`](Self::create_object_url).
    fn revoke_object_url(&self, url: &str);
}

/// An object URL that is revoked when dropped.
pub struct ObjectUrl<'a, S: DownloadSink + ?Sized> {
    sink: &'a S,
    url: Option<String>,
}

impl<'a, S: DownloadSink + ?Sized> ObjectUrl<'a, S> {
    pub async fn create(sink: &'a S, bytes: &[u8], content_type: &str) -> Result<Self, SinkError> {
        let url = sink.create_object_url(bytes, content_type).await?;
        Ok(Self {
            sink,
            url: Some(url),
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }
}

impl<S: DownloadSink + ?Sized> Drop for ObjectUrl<'_, S> {
    fn drop(&mut self) {
        if let Some(url) = self.url.take() {
            self.sink.revoke_object_url(&url);
        }
    }
}

/// Offer `bytes` to the user as `file_name`.
///
/// The object URL is released exactly once, whether the click succeeds,
/// fails, or the future is dropped mid-way.
pub async fn trigger_download<S: DownloadSink + ?Sized>(
    sink: &S,
    bytes: &[u8],
    file_name: &str,
    content_type: &str,
) -> Result<(), SinkError> {
    let object_url = ObjectUrl::create(sink, bytes, content_type).await?;
    let clicked = sink.click_download(object_url.url(), file_name).await;
    drop(object_url);
    clicked
}
