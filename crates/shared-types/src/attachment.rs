use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::{Validate, ValidationError};

// ---------------------------------------------------------------------------
// Attachment metadata
// ---------------------------------------------------------------------------

/// One row of case attachment metadata, as listed for a record.
///
/// The triple `(case_reference, document_type, file_name)` is both the row
/// identity and the blob path below the container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct AttachmentRow {
    pub case_reference: String,
    pub document_type: String,
    pub file_name: String,
}

impl AttachmentRow {
    pub fn new(
        case_reference: impl Into<String>,
        document_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            case_reference: case_reference.into(),
            document_type: document_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Blob location addressed by this row.
    pub fn location(&self) -> BlobLocation {
        BlobLocation::from(self)
    }
}

/// Row actions offered by the attachments table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    OpenFile,
}

impl RowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowAction::OpenFile => "OpenFile",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RowAction::OpenFile => "Open File",
        }
    }
}

/// Event emitted by the table when the user triggers a row action.
#[derive(Debug, Clone, PartialEq)]
pub struct RowActionEvent {
    pub action: RowAction,
    pub location: BlobLocation,
}

// ---------------------------------------------------------------------------
// Blob location
// ---------------------------------------------------------------------------

/// The three path segments identifying a blob inside the attachments container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct BlobLocation {
    #[cfg_attr(
        feature = "validation",
        validate(
            length(min = 1, max = 1024, message = "Case reference is required"),
            custom(function = "validate_path_segment")
        )
    )]
    pub case_id: String,
    #[cfg_attr(
        feature = "validation",
        validate(
            length(min = 1, max = 1024, message = "Document type is required"),
            custom(function = "validate_path_segment")
        )
    )]
    pub document_type: String,
    #[cfg_attr(
        feature = "validation",
        validate(
            length(min = 1, max = 1024, message = "File name is required"),
            custom(function = "validate_path_segment")
        )
    )]
    pub file_name: String,
}

impl BlobLocation {
    pub fn new(
        case_id: impl Into<String>,
        document_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            document_type: document_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Percent-encoded path below the container: `{case}/{type}/{file}`.
    pub fn encoded_path(&self) -> String {
        format!(
            "{}/{}/{}",
            urlencoding::encode(&self.case_id),
            urlencoding::encode(&self.document_type),
            urlencoding::encode(&self.file_name)
        )
    }
}

impl From<&AttachmentRow> for BlobLocation {
    fn from(row: &AttachmentRow) -> Self {
        Self {
            case_id: row.case_reference.clone(),
            document_type: row.document_type.clone(),
            file_name: row.file_name.clone(),
        }
    }
}

/// A single blob path segment must not escape its position in the path.
#[cfg(feature = "validation")]
fn validate_path_segment(value: &str) -> Result<(), ValidationError> {
    if value.contains('/') || value.contains('\\') || value == "." || value == ".." {
        let mut err = ValidationError::new("path_segment");
        err.message = Some("Must not contain path separators or traversal segments".into());
        return Err(err);
    }
    Ok(())
}
