use base64::Engine;
use blob_download::{DownloadSink, SinkError};
use dioxus::prelude::document;

const CREATE_OBJECT_URL_JS: &str = r#"
    const [encoded, contentType] = await dioxus.recv();
    const binary = atob(encoded);
    const bytes = new Uint8Array(binary.length);
    for (let i = 0; i < binary.length; i++) {
        bytes[i] = binary.charCodeAt(i);
    }
    return URL.createObjectURL(new Blob([bytes], { type: contentType }));
"#;

const CLICK_DOWNLOAD_JS: &str = r#"
    const [url, fileName] = await dioxus.recv();
    const anchor = document.createElement('a');
    anchor.href = url;
    anchor.download = fileName;
    anchor.rel = 'noopener';
    anchor.style.display = 'none';
    document.body.appendChild(anchor);
    try {
        anchor.click();
    } finally {
        anchor.remove();
    }
    return true;
"#;

/// Saves bytes through a temporary object URL and a hidden anchor click.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSink;

impl DownloadSink for BrowserSink {
    async fn create_object_url(&self, bytes: &[u8], content_type: &str) -> Result<String, SinkError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let eval = document::eval(CREATE_OBJECT_URL_JS);
        eval.send((encoded, content_type))
            .map_err(|e| SinkError(format!("createObjectURL: {e}")))?;
        eval.join::<String>()
            .await
            .map_err(|e| SinkError(format!("createObjectURL: {e}")))
    }

    async fn click_download(&self, url: &str, file_name: &str) -> Result<(), SinkError> {
        let eval = document::eval(CLICK_DOWNLOAD_JS);
        eval.send((url, file_name))
            .map_err(|e| SinkError(format!("download click: {e}")))?;
        eval.join::<bool>()
            .await
            .map(|_| ())
            .map_err(|e| SinkError(format!("download click: {e}")))
    }

    fn revoke_object_url(&self, url: &str) {
        let literal = match serde_json::to_string(url) {
            Ok(literal) => literal,
            Err(e) => {
                tracing::warn!(error = %e, "Could not encode object URL for revocation");
                return;
            }
        };
        document::eval(&format!("URL.revokeObjectURL({literal});"));
    }
}
