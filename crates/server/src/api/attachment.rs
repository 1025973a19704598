use dioxus::prelude::*;
use shared_types::{AttachmentRow, DownloadSettings, FilePayload};

#[cfg(feature = "server")]
use crate::error_convert::AppErrorExt;

// ═══════════════════════════════════════════════════════════════
// Attachment server functions
// ═══════════════════════════════════════════════════════════════

/// List the attachments registered for a record.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_attachment_list(record_id: String) -> Result<Vec<AttachmentRow>, ServerFnError> {
    use crate::db::get_db;
    use crate::repo::attachment;
    use shared_types::AppError;

    let record_id = record_id.trim();
    if record_id.is_empty() {
        return Err(AppError::bad_request("record_id must not be empty").into_server_fn_error());
    }

    let pool = get_db().await;
    attachment::list_for_record(pool, record_id)
        .await
        .map_err(AppErrorExt::into_server_fn_error)
}

/// Current time formatted for `x-ms-date`.
#[server]
pub async fn get_formatted_timestamp() -> Result<String, ServerFnError> {
    Ok(crate::db::get_storage().formatted_timestamp())
}

/// SharedKey signature for a GET of one blob, computed over `timestamp`.
#[cfg_attr(feature = "server", tracing::instrument(skip(timestamp)))]
#[server]
pub async fn get_auth_signature(
    case_id: String,
    document_type: String,
    file_name: String,
    timestamp: String,
) -> Result<String, ServerFnError> {
    let location = shared_types::BlobLocation::new(case_id, document_type, file_name);

    crate::db::get_storage()
        .sign(&location, &timestamp)
        .map_err(|e| {
            tracing::warn!(error = %e, "Signature request refused");
            e.into_server_fn_error()
        })
}

/// Fetch a blob server-side. Returns the bytes base64-encoded together with
/// the content type the store reported.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_file_bytes(
    case_id: String,
    document_type: String,
    file_name: String,
) -> Result<FilePayload, ServerFnError> {
    use base64::Engine;

    let location = shared_types::BlobLocation::new(case_id, document_type, file_name);
    let file = crate::db::get_storage()
        .fetch(&location)
        .await
        .map_err(AppErrorExt::into_server_fn_error)?;

    Ok(FilePayload {
        data: base64::engine::general_purpose::STANDARD.encode(&file.bytes),
        content_type: file.content_type,
    })
}

/// Storage endpoint and download mode for the attachments page.
#[server]
pub async fn get_download_settings() -> Result<DownloadSettings, ServerFnError> {
    Ok(crate::db::get_storage().settings())
}
