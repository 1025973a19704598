use dioxus::prelude::*;
use shared_ui::{
    Button, Card, CardContent, CardDescription, CardHeader, CardTitle, PageHeader, PageTitle,
};

use crate::routes::Route;

/// Landing page. Attachments are always viewed in the context of a record,
/// so this only asks for one.
#[component]
pub fn Home() -> Element {
    let mut record_id = use_signal(String::new);
    let trimmed = use_memo(move || record_id.read().trim().to_string());

    let open_record = move |_| {
        let id = trimmed();
        if id.is_empty() {
            return;
        }
        navigator().push(Route::RecordAttachments { record_id: id });
    };

    rsx! {
        PageHeader {
            PageTitle { "Case Attachments" }
        }
        Card {
            CardHeader {
                CardTitle { "Open a record" }
                CardDescription { "Enter a record id to list the files attached to its cases." }
            }
            CardContent {
                div { class: "home-form",
                    input {
                        r#type: "text",
                        placeholder: "Record id",
                        "aria-label": "Record id",
                        value: "{record_id}",
                        oninput: move |e| record_id.set(e.value()),
                    }
                    Button {
                        disabled: trimmed.read().is_empty(),
                        onclick: open_record,
                        "Show attachments"
                    }
                }
            }
        }
    }
}
