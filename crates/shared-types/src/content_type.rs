//! Content-type resolution for downloaded attachments.

/// Fallback when neither the response nor the extension says anything useful.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Infer a MIME type from a file name's extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => return OCTET_STREAM,
    };

    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "odt" => "application/vnd.oasis.opendocument.text",
        "rtf" => "application/rtf",
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "htm" | "html" => "text/html",
        "xml" => "application/xml",
        "json" => "application/json",
        "msg" => "application/vnd.ms-outlook",
        "eml" => "message/rfc822",
        "zip" => "application/zip",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        _ => OCTET_STREAM,
    }
}

/// Pick the content type for a download.
///
/// A specific type reported by the server wins; a missing or generic one
/// (`application/octet-stream`) falls back to the file extension.
pub fn resolve_content_type(reported: Option<&str>, file_name: &str) -> String {
    let reported = reported
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(OCTET_STREAM));

    match reported {
        Some(value) => value.to_ascii_lowercase(),
        None => content_type_for(file_name).to_string(),
    }
}
