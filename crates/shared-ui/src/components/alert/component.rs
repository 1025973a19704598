use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{LdCircleAlert, LdCircleCheck, LdInfo};
use dioxus_free_icons::Icon;

/// Visual variant for inline alerts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AlertVariant {
    #[default]
    Info,
    Success,
    Destructive,
}

impl AlertVariant {
    fn class(&self) -> &'static str {
        match self {
            AlertVariant::Info => "info",
            AlertVariant::Success => "success",
            AlertVariant::Destructive => "destructive",
        }
    }
}

/// Inline status message. Announced to assistive tech via `role="alert"`.
#[component]
pub fn Alert(
    #[props(default)] variant: AlertVariant,
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![
        Attribute::new("class", "alert", None, false),
        Attribute::new("data-style", variant.class(), None, false),
        Attribute::new("role", "alert", None, false),
    ];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div {
            ..merged,
            span { class: "alert-icon",
                {match variant {
                    AlertVariant::Info => rsx! { Icon::<LdInfo> { icon: LdInfo, width: 16, height: 16 } },
                    AlertVariant::Success => rsx! { Icon::<LdCircleCheck> { icon: LdCircleCheck, width: 16, height: 16 } },
                    AlertVariant::Destructive => rsx! { Icon::<LdCircleAlert> { icon: LdCircleAlert, width: 16, height: 16 } },
                }}
            }
            div { class: "alert-body", {children} }
        }
    }
}

#[component]
pub fn AlertDescription(children: Element) -> Element {
    rsx! {
        p { class: "alert-description", {children} }
    }
}
