use dioxus::prelude::*;

/// Loading placeholder with animated pulse.
#[component]
pub fn Skeleton(#[props(extends = GlobalAttributes)] attributes: Vec<Attribute>) -> Element {
    let base = vec![Attribute::new("class", "skeleton", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div {
            ..merged,
        }
    }
}

/// Stack of bar placeholders shaped like a table that is still loading.
#[component]
pub fn SkeletonRows(#[props(default = 3)] rows: usize) -> Element {
    rsx! {
        div { class: "skeleton-rows", "aria-busy": "true",
            Skeleton { class: "skeleton-bar skeleton-heading" }
            for _ in 0..rows {
                Skeleton { class: "skeleton-bar" }
            }
        }
    }
}
