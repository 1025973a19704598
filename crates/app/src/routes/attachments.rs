use std::collections::HashMap;

use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::LdDownload;
use dioxus_free_icons::Icon;
use shared_types::{
    AppError, AttachmentRow, BlobLocation, DownloadMode, RowAction, RowActionEvent,
};
use shared_ui::components::{
    Alert, AlertDescription, AlertVariant, Badge, Button, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, DataTable, DataTableBody, DataTableCell,
    DataTableColumn, DataTableEmpty, DataTableHeader, DataTableRow, PageHeader, PageSubtitle,
    PageTitle, SkeletonRows,
};
use shared_ui::{use_toast, ToastOptions};

use crate::download::AttachmentDownloader;

const COLUMNS: [&str; 4] = ["Case Reference", "Document Type", "Filename", "Open"];

/// Where a single row's download currently stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DownloadStatus {
    #[default]
    Idle,
    Downloading,
    Failed(String),
}

impl DownloadStatus {
    pub fn is_downloading(&self) -> bool {
        matches!(self, DownloadStatus::Downloading)
    }

    /// Value for the row's `data-state` attribute.
    pub fn data_state(&self) -> &'static str {
        match self {
            DownloadStatus::Idle => "idle",
            DownloadStatus::Downloading => "downloading",
            DownloadStatus::Failed(_) => "failed",
        }
    }
}

/// Event raised by the Open button of `row`.
pub fn open_file_event(row: &AttachmentRow) -> RowActionEvent {
    RowActionEvent {
        action: RowAction::OpenFile,
        location: row.location(),
    }
}

/// Emit the Open event for `row` unless its download is already running.
fn open_row(row: &AttachmentRow, status: &DownloadStatus, emit: impl FnOnce(RowActionEvent)) {
    if !status.is_downloading() {
        emit(open_file_event(row));
    }
}

/// Mark the event's row as downloading and return the row to fetch. Returns
/// `None` while a download for the same row is in flight.
pub fn claim_download(
    statuses: &mut HashMap<BlobLocation, DownloadStatus>,
    event: &RowActionEvent,
) -> Option<AttachmentRow> {
    match event.action {
        RowAction::OpenFile => {
            let status = statuses.entry(event.location.clone()).or_default();
            if status.is_downloading() {
                return None;
            }
            *status = DownloadStatus::Downloading;
            let location = &event.location;
            Some(AttachmentRow::new(
                &location.case_id,
                &location.document_type,
                &location.file_name,
            ))
        }
    }
}

/// User-facing text for a failed metadata or settings call.
fn load_error_message(err: &ServerFnError) -> String {
    AppError::friendly_message(&err.to_string())
}

#[component]
pub fn RecordAttachments(record_id: String) -> Element {
    let rows = use_resource(use_reactive!(|record_id| async move {
        server::api::get_attachment_list(record_id).await
    }));
    let settings = use_resource(|| async { server::api::get_download_settings().await });

    let downloader = use_memo(move || match &*settings.read() {
        Some(Ok(settings)) => Some(AttachmentDownloader::from_settings(settings)),
        _ => None,
    });
    let mut statuses = use_signal(HashMap::<BlobLocation, DownloadStatus>::new);
    let toast = use_toast();

    // Downloads are spawned from this page, so leaving it drops them.
    let on_row_action = move |event: RowActionEvent| {
        tracing::info!(
            action = event.action.as_str(),
            case = %event.location.case_id,
            file = %event.location.file_name,
            "Row action"
        );
        let Some(downloader) = downloader() else {
            return;
        };
        let Some(row) = claim_download(&mut statuses.write(), &event) else {
            return;
        };

        spawn(async move {
            let outcome = match downloader.download(&row).await {
                Ok(receipt) => {
                    toast.success(format!("Downloaded {}", receipt.file_name), ToastOptions::new());
                    DownloadStatus::Idle
                }
                Err(e) => {
                    tracing::error!(kind = %e.kind, file = %e.file_name, status = ?e.status, "{e}");
                    let message = e.to_string();
                    toast.error(message.clone(), ToastOptions::new());
                    DownloadStatus::Failed(message)
                }
            };
            statuses.write().insert(row.location(), outcome);
        });
    };

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./attachments.css") }

        PageHeader {
            div {
                PageTitle { "Attachments" }
                PageSubtitle { "Record {record_id}" }
            }
        }

        {match (&*rows.read(), &*settings.read()) {
            (Some(Err(e)), _) => rsx! {
                LoadError { title: "Could not load attachments", message: load_error_message(e) }
            },
            (_, Some(Err(e))) => rsx! {
                LoadError { title: "Downloads are unavailable", message: load_error_message(e) }
            },
            (Some(Ok(list)), Some(Ok(_))) => match downloader() {
                Some(downloader) => rsx! {
                    AttachmentTable {
                        rows: list.clone(),
                        statuses: statuses(),
                        proxied: downloader.mode() == DownloadMode::Proxy,
                        on_row_action,
                    }
                },
                None => rsx! { SkeletonRows { rows: 4 } },
            },
            _ => rsx! { SkeletonRows { rows: 4 } },
        }}
    }
}

#[component]
fn LoadError(title: String, message: String) -> Element {
    rsx! {
        Card { class: "load-error",
            CardHeader {
                CardTitle { "{title}" }
                CardDescription { "Reload the page to try again." }
            }
            CardContent {
                Alert { variant: AlertVariant::Destructive,
                    AlertDescription { "{message}" }
                }
            }
        }
    }
}

/// Attachment rows with one Open action each. Never modifies `rows`; a click
/// emits a single [`RowActionEvent`] through `on_row_action`.
#[component]
pub fn AttachmentTable(
    rows: Vec<AttachmentRow>,
    #[props(default)] statuses: HashMap<BlobLocation, DownloadStatus>,
    #[props(default)] proxied: bool,
    on_row_action: EventHandler<RowActionEvent>,
) -> Element {
    rsx! {
        DataTable {
            DataTableHeader {
                for column in COLUMNS {
                    DataTableColumn { "{column}" }
                }
            }
            DataTableBody {
                if rows.is_empty() {
                    DataTableEmpty { colspan: COLUMNS.len() as u32,
                        "No attachments are listed for this record."
                    }
                }
                for row in rows {
                    AttachmentRowView {
                        key: "{row.case_reference}/{row.document_type}/{row.file_name}",
                        status: statuses.get(&row.location()).cloned().unwrap_or_default(),
                        row: row.clone(),
                        on_row_action,
                    }
                }
            }
        }
        if proxied {
            p { class: "attachments-footnote", "Files are delivered through the application server." }
        }
    }
}

#[component]
fn AttachmentRowView(
    row: AttachmentRow,
    status: DownloadStatus,
    on_row_action: EventHandler<RowActionEvent>,
) -> Element {
    let label = RowAction::OpenFile.label();

    let open = {
        let row = row.clone();
        let status = status.clone();
        move |_| open_row(&row, &status, |event| on_row_action.call(event))
    };

    rsx! {
        DataTableRow { state: status.data_state(),
            DataTableCell { "{row.case_reference}" }
            DataTableCell {
                Badge { "{row.document_type}" }
            }
            DataTableCell {
                span { class: "attachment-file-name", "{row.file_name}" }
                if let DownloadStatus::Failed(message) = &status {
                    Alert { variant: AlertVariant::Destructive, class: "attachment-row-error",
                        AlertDescription { "{message}" }
                    }
                }
            }
            DataTableCell {
                Button {
                    variant: ButtonVariant::Outline,
                    loading: status.is_downloading(),
                    title: "{label} {row.file_name}",
                    onclick: open,
                    Icon::<LdDownload> { icon: LdDownload, width: 16, height: 16 }
                    "{label}"
                }
            }
        }
    }
}
