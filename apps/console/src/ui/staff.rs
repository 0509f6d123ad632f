use dioxus::prelude::*;

use crate::hooks::roster::use_roster_feed;
use crate::models::StaffRecord;
use crate::roster::{
    department_options, filter_staff, role_options, ListingState, RosterStats, ALL_SENTINEL,
};
use crate::routes::Route;
use crate::services::backend::StaffBackend;
use crate::state::{use_app_actions, use_app_state};
use crate::ui::staff_card::StaffCard;

const SELECT_CLASS: &str = "w-full rounded-md border border-gray-300 bg-white px-3 py-2 text-sm md:w-48";

#[component]
pub fn StaffDirectory() -> Element {
    use_roster_feed();

    let actions = use_app_actions();
    let backend = use_context::<StaffBackend>();
    let snapshot = use_app_state().read().staff.clone();

    let stats = RosterStats::from_roster(&snapshot.roster);
    let departments = department_options(&snapshot.roster);
    let roles = role_options(&snapshot.roster);
    let visible: Vec<StaffRecord> = filter_staff(&snapshot.roster, &snapshot.filter)
        .into_iter()
        .cloned()
        .collect();
    let listing = ListingState::resolve(&snapshot.feed, snapshot.roster.len(), visible.len());
    let synced = snapshot.last_synced_label();
    let filtered_out = listing == ListingState::FilteredOut;
    let narrowed = !snapshot.filter.is_unconstrained();
    let visible_count = visible.len();

    let search_term = snapshot.filter.search_term.clone();
    let department_value = snapshot.filter.department.as_select_value().to_string();
    let role_value = snapshot.filter.role.as_select_value().to_string();

    rsx! {
        div { class: "space-y-6",
            div { class: "flex flex-col gap-4 md:flex-row md:items-center md:justify-between",
                div {
                    h1 { class: "text-2xl font-bold text-gray-900", "Staff Management" }
                    p { class: "text-sm text-gray-500", "Manage your team members and their roles" }
                }
                Link {
                    class: "inline-flex items-center rounded-md bg-blue-600 px-4 py-2 text-sm font-medium text-white hover:bg-blue-700",
                    to: Route::NewStaff {},
                    "Add Staff Member"
                }
            }

            div { class: "grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-4",
                StatCard { label: "Total Staff", value: stats.total }
                StatCard { label: "Active", value: stats.active }
                StatCard { label: "Lawyers", value: stats.lawyers }
                StatCard { label: "Available", value: stats.available }
            }

            div { class: "flex flex-col gap-3 md:flex-row",
                input {
                    r#type: "search",
                    class: "w-full flex-1 rounded-md border border-gray-300 px-3 py-2 text-sm",
                    placeholder: "Search staff members...",
                    value: "{search_term}",
                    oninput: move |evt: FormEvent| actions.set_search_term(evt.value()),
                }
                select {
                    class: SELECT_CLASS,
                    value: "{department_value}",
                    onchange: move |evt: FormEvent| actions.select_department(&evt.value()),
                    for department in departments {
                        option { key: "{department}", value: "{department}",
                            {option_label(&department, "All Departments").to_string()}
                        }
                    }
                }
                select {
                    class: SELECT_CLASS,
                    value: "{role_value}",
                    onchange: move |evt: FormEvent| actions.select_role(&evt.value()),
                    for role in roles {
                        option { key: "{role}", value: "{role}",
                            {option_label(&role, "All Roles").to_string()}
                        }
                    }
                }
            }

            div { class: "flex items-center justify-between text-xs text-gray-400",
                if narrowed {
                    span { "Showing {visible_count} of {stats.total}" }
                } else {
                    span {}
                }
                if let Some(synced) = synced {
                    span { "Last synced {synced}" }
                }
            }

            match listing {
                ListingState::Connecting => rsx! {
                    p { class: "py-12 text-center text-sm text-gray-500", "Loading staff roster..." }
                },
                ListingState::Unavailable(reason) => rsx! {
                    div { class: "rounded-lg border border-amber-200 bg-amber-50 p-6 text-center",
                        h3 { class: "text-sm font-semibold text-amber-800", "Staff roster unavailable" }
                        p { class: "mt-1 text-xs text-amber-700", "{reason}" }
                    }
                },
                state if state.shows_empty_state() => rsx! {
                    EmptyRoster { filtered: filtered_out }
                },
                _ => rsx! {
                    div { class: "grid grid-cols-1 gap-6 md:grid-cols-2 lg:grid-cols-3",
                        for member in visible {
                            StaffCard {
                                key: "{member.id}",
                                staff: member.clone(),
                                on_update: {
                                    let backend = backend.clone();
                                    move |record: StaffRecord| backend.updater.update(record)
                                },
                            }
                        }
                    }
                },
            }
        }
    }
}

fn option_label<'a>(value: &'a str, all_label: &'a str) -> &'a str {
    if value == ALL_SENTINEL {
        all_label
    } else {
        value
    }
}

#[component]
fn StatCard(label: &'static str, value: usize) -> Element {
    rsx! {
        div { class: "rounded-lg border border-gray-200 bg-white p-4 shadow-sm",
            p { class: "text-sm text-gray-500", "{label}" }
            p { class: "mt-1 text-2xl font-semibold text-gray-900", "{value}" }
        }
    }
}

#[component]
fn EmptyRoster(filtered: bool) -> Element {
    let actions = use_app_actions();

    rsx! {
        div { class: "py-12 text-center",
            h3 { class: "text-lg font-medium text-gray-900", "No staff members found" }
            p { class: "mt-1 text-sm text-gray-500",
                "Try adjusting your search criteria or add a new staff member."
            }
            div { class: "mt-4 flex justify-center gap-2",
                if filtered {
                    button {
                        class: "rounded-md border border-gray-300 px-4 py-2 text-sm text-gray-700 hover:bg-gray-50",
                        onclick: move |_| actions.clear_filters(),
                        "Clear filters"
                    }
                }
                Link {
                    class: "rounded-md bg-blue-600 px-4 py-2 text-sm font-medium text-white hover:bg-blue-700",
                    to: Route::NewStaff {},
                    "Add Staff Member"
                }
            }
        }
    }
}
