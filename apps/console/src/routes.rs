use dioxus::prelude::*;

use crate::state::use_session;
use crate::ui::sidebar::Sidebar;
use crate::ui::staff::StaffDirectory;
use crate::ui::staff_new::NewStaff;

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(DashboardShell)]
        #[route("/dashboard")]
        Dashboard {},
        #[route("/dashboard/staff")]
        StaffDirectory {},
        #[route("/dashboard/staff/new")]
        NewStaff {},
        #[route("/dashboard/cases")]
        Cases {},
        #[route("/dashboard/clients")]
        Clients {},
        #[route("/dashboard/chats")]
        Chats {},
        #[route("/dashboard/departments")]
        Departments {},
        #[route("/dashboard/search")]
        Search {},
        #[route("/dashboard/emails")]
        Emails {},
        #[route("/dashboard/invoices")]
        Invoices {},
        #[route("/dashboard/profile")]
        Profile {},
        #[route("/dashboard/security")]
        Security {},
        #[route("/dashboard/preferences")]
        Preferences {},
    #[end_layout]
    #[redirect("/", || Route::StaffDirectory {})]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[component]
fn DashboardShell() -> Element {
    let session = use_session();
    let mut drawer_open = use_signal(|| false);

    rsx! {
        div { class: "flex min-h-screen bg-gray-50",
            Sidebar { session, drawer_open }
            div { class: "flex min-w-0 flex-1 flex-col",
                header { class: "flex h-14 items-center border-b border-gray-200 bg-white px-4 lg:hidden",
                    button {
                        class: "rounded p-2 text-gray-600 hover:bg-gray-100",
                        aria_label: "Open navigation",
                        onclick: move |_| drawer_open.set(true),
                        "☰"
                    }
                    span { class: "ml-3 text-base font-semibold text-gray-900", "LegalFlow" }
                }
                main { class: "flex-1 p-4 md:p-8",
                    Outlet::<Route> {}
                }
            }
        }
    }
}

#[component]
fn SectionPlaceholder(title: &'static str) -> Element {
    rsx! {
        div { class: "rounded-lg border border-dashed border-gray-300 bg-white p-10 text-center",
            h1 { class: "text-xl font-semibold text-gray-900", "{title}" }
            p { class: "mt-2 text-sm text-gray-500", "This section is not available in the console yet." }
        }
    }
}

#[component]
fn Dashboard() -> Element {
    rsx! { SectionPlaceholder { title: "Dashboard" } }
}

#[component]
fn Cases() -> Element {
    rsx! { SectionPlaceholder { title: "Cases" } }
}

#[component]
fn Clients() -> Element {
    rsx! { SectionPlaceholder { title: "Clients" } }
}

#[component]
fn Chats() -> Element {
    rsx! { SectionPlaceholder { title: "Chats" } }
}

#[component]
fn Departments() -> Element {
    rsx! { SectionPlaceholder { title: "Departments" } }
}

#[component]
fn Search() -> Element {
    rsx! { SectionPlaceholder { title: "Search" } }
}

#[component]
fn Emails() -> Element {
    rsx! { SectionPlaceholder { title: "Email" } }
}

#[component]
fn Invoices() -> Element {
    rsx! { SectionPlaceholder { title: "Invoices" } }
}

#[component]
fn Profile() -> Element {
    rsx! { SectionPlaceholder { title: "Profile" } }
}

#[component]
fn Security() -> Element {
    rsx! { SectionPlaceholder { title: "Security" } }
}

#[component]
fn Preferences() -> Element {
    rsx! { SectionPlaceholder { title: "Preferences" } }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div { class: "flex min-h-screen flex-col items-center justify-center gap-3 bg-gray-50",
            h1 { class: "text-2xl font-semibold text-gray-900", "Page not found" }
            p { class: "text-sm text-gray-500", "/{path}" }
            Link { class: "text-sm text-blue-600 hover:underline", to: Route::StaffDirectory {}, "Back to staff" }
        }
    }
}
