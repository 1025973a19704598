pub mod attachments;
pub mod home;
pub mod not_found;

use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::LdPaperclip;
use dioxus_free_icons::Icon;

use attachments::RecordAttachments;
use home::Home;
use not_found::NotFound;

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(AppLayout)]
    #[route("/")]
    Home {},
    #[route("/records/:record_id/attachments")]
    RecordAttachments { record_id: String },
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

#[component]
fn AppLayout() -> Element {
    rsx! {
        div { class: "app-shell",
            header { class: "app-topbar",
                Icon::<LdPaperclip> { icon: LdPaperclip, width: 18, height: 18 }
                Link { to: Route::Home {}, "Case Attachments" }
            }
            main { class: "app-main",
                Outlet::<Route> {}
            }
        }
    }
}
