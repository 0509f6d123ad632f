use dioxus::prelude::*;

use crate::hooks::session::end_session;
use crate::routes::Route;
use crate::state::SessionSignal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavGroup {
    pub label: &'static str,
    pub items: &'static [NavItem],
}

pub const PRIMARY_NAV: [NavItem; 7] = [
    NavItem { label: "Dashboard", href: "/dashboard" },
    NavItem { label: "Cases", href: "/dashboard/cases" },
    NavItem { label: "Clients", href: "/dashboard/clients" },
    NavItem { label: "Chats", href: "/dashboard/chats" },
    NavItem { label: "Departments", href: "/dashboard/departments" },
    NavItem { label: "Staff", href: "/dashboard/staff" },
    NavItem { label: "Search", href: "/dashboard/search" },
];

pub const NAV_GROUPS: [NavGroup; 2] = [
    NavGroup {
        label: "Communication",
        items: &[
            NavItem { label: "Email", href: "/dashboard/emails" },
            NavItem { label: "Invoice", href: "/dashboard/invoices" },
        ],
    },
    NavGroup {
        label: "Settings",
        items: &[
            NavItem { label: "Profile", href: "/dashboard/profile" },
            NavItem { label: "Security", href: "/dashboard/security" },
            NavItem { label: "Preferences", href: "/dashboard/preferences" },
        ],
    },
];

impl NavItem {
    pub fn route(&self) -> Route {
        self.href
            .parse()
            .unwrap_or_else(|_| Route::NotFound { segments: Vec::new() })
    }

    /// Exact match for the dashboard root, prefix match for everything else
    /// so nested pages such as the new-member form keep "Staff" lit.
    pub fn is_active(&self, path: &str) -> bool {
        if self.href == "/dashboard" {
            return path == self.href;
        }
        path == self.href || path.starts_with(&format!("{}/", self.href))
    }
}

#[component]
pub fn Sidebar(session: SessionSignal, drawer_open: Signal<bool>) -> Element {
    let mut drawer_open = drawer_open;
    let path = use_route::<Route>().to_string();

    let drawer_class = if drawer_open() {
        "fixed inset-0 z-40 flex lg:hidden"
    } else {
        "hidden"
    };

    rsx! {
        aside { class: "hidden w-64 shrink-0 border-r border-gray-200 bg-white lg:flex lg:flex-col",
            SidebarBody { session, path: path.clone(), on_navigate: move |_| {} }
        }
        div { class: drawer_class,
            div {
                class: "fixed inset-0 bg-black/40",
                onclick: move |_| drawer_open.set(false),
            }
            aside { class: "relative flex w-64 flex-col bg-white",
                SidebarBody { session, path, on_navigate: move |_| drawer_open.set(false) }
            }
        }
    }
}

#[component]
fn SidebarBody(session: SessionSignal, path: String, on_navigate: EventHandler<()>) -> Element {
    let context = session.read().clone();
    let name = context.display_name().to_string();
    let role = context.display_role().to_string();
    let initials = context.initials();
    let photo = context.user().and_then(|user| user.photo_url.clone());

    rsx! {
        div { class: "flex h-16 items-center px-6 text-lg font-bold text-blue-700", "LegalFlow" }
        nav { class: "flex-1 space-y-6 overflow-y-auto px-3 py-4",
            ul { class: "space-y-1",
                for item in PRIMARY_NAV {
                    NavLink { key: "{item.href}", item, active: item.is_active(&path), on_navigate }
                }
            }
            for group in NAV_GROUPS {
                NavGroupSection { key: "{group.label}", group, path: path.clone(), on_navigate }
            }
        }
        div { class: "flex items-center gap-3 border-t border-gray-200 px-4 py-3",
            if let Some(photo) = photo {
                img { class: "h-9 w-9 rounded-full object-cover", src: "{photo}", alt: "{name}" }
            } else {
                div { class: "flex h-9 w-9 items-center justify-center rounded-full bg-blue-100 text-sm font-semibold text-blue-700",
                    "{initials}"
                }
            }
            div { class: "min-w-0 flex-1",
                p { class: "truncate text-sm font-medium text-gray-900", "{name}" }
                p { class: "truncate text-xs text-gray-500", "{role}" }
            }
            if context.is_signed_in() {
                button {
                    class: "rounded px-2 py-1 text-xs text-gray-500 hover:bg-gray-100",
                    onclick: move |_| end_session(session),
                    "Log out"
                }
            }
        }
    }
}

/// Groups start expanded when one of their links is the current page.
#[component]
fn NavGroupSection(group: NavGroup, path: String, on_navigate: EventHandler<()>) -> Element {
    let holds_current = group.items.iter().any(|item| item.is_active(&path));
    let mut expanded = use_signal(|| holds_current);
    let marker = if expanded() { "▾" } else { "▸" };

    rsx! {
        div {
            button {
                class: "flex w-full items-center justify-between px-3 text-xs font-semibold uppercase tracking-wide text-gray-400 hover:text-gray-600",
                onclick: move |_| expanded.toggle(),
                span { "{group.label}" }
                span { "{marker}" }
            }
            if expanded() {
                ul { class: "mt-2 space-y-1",
                    for item in group.items.iter().copied() {
                        NavLink { key: "{item.href}", item, active: item.is_active(&path), on_navigate }
                    }
                }
            }
        }
    }
}

#[component]
fn NavLink(item: NavItem, active: bool, on_navigate: EventHandler<()>) -> Element {
    let class = if active {
        "block rounded-md bg-blue-50 px-3 py-2 text-sm font-medium text-blue-700"
    } else {
        "block rounded-md px-3 py-2 text-sm text-gray-600 hover:bg-gray-50"
    };

    rsx! {
        li {
            onclick: move |_| on_navigate.call(()),
            Link { class, to: item.route(), "{item.label}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_items() -> Vec<NavItem> {
        PRIMARY_NAV
            .iter()
            .copied()
            .chain(NAV_GROUPS.iter().flat_map(|group| group.items.iter().copied()))
            .collect()
    }

    #[test]
    fn every_nav_href_resolves_to_a_page() {
        for item in all_items() {
            let route = item.route();
            assert!(
                !matches!(route, Route::NotFound { .. }),
                "{} did not resolve",
                item.href
            );
            assert_eq!(route.to_string(), item.href);
        }
    }

    #[test]
    fn staff_link_stays_lit_on_nested_pages() {
        let staff = PRIMARY_NAV[5];
        assert!(staff.is_active("/dashboard/staff"));
        assert!(staff.is_active("/dashboard/staff/new"));
        assert!(!staff.is_active("/dashboard/staffing"));
    }

    #[test]
    fn dashboard_link_only_matches_root() {
        let dashboard = PRIMARY_NAV[0];
        assert!(dashboard.is_active("/dashboard"));
        assert!(!dashboard.is_active("/dashboard/staff"));
    }

    #[test]
    fn hrefs_are_unique() {
        let mut hrefs: Vec<_> = all_items().into_iter().map(|item| item.href).collect();
        let before = hrefs.len();
        hrefs.sort_unstable();
        hrefs.dedup();
        assert_eq!(hrefs.len(), before);
    }
}
