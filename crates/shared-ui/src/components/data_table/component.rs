use dioxus::prelude::*;

/// Scrollable table wrapper with co-located styles.
#[component]
pub fn DataTable(children: Element) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "data-table",
            table {
                {children}
            }
        }
    }
}

/// Table header section. Wraps `th` elements in a `thead > tr`.
#[component]
pub fn DataTableHeader(children: Element) -> Element {
    rsx! {
        thead {
            tr { {children} }
        }
    }
}

#[component]
pub fn DataTableBody(children: Element) -> Element {
    rsx! {
        tbody { {children} }
    }
}

#[component]
pub fn DataTableColumn(children: Element) -> Element {
    rsx! {
        th { scope: "col", {children} }
    }
}

/// Table row. `state` is written to `data-state` so rows can be styled
/// by whatever their owner is doing with them (e.g. `downloading`).
#[component]
pub fn DataTableRow(
    #[props(default)] state: String,
    children: Element,
) -> Element {
    rsx! {
        tr {
            class: "data-table-row",
            "data-state": state,
            {children}
        }
    }
}

#[component]
pub fn DataTableCell(children: Element) -> Element {
    rsx! {
        td { {children} }
    }
}

/// Single full-width row shown when the body has nothing to list.
#[component]
pub fn DataTableEmpty(colspan: u32, children: Element) -> Element {
    rsx! {
        tr { class: "data-table-empty",
            td { colspan: "{colspan}", {children} }
        }
    }
}
