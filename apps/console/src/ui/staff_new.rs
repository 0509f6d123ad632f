use dioxus::prelude::*;
use tracing::info;

use crate::editor::{EmergencyField, StaffEditor, StaffField};
use crate::models::StaffRecord;
use crate::routes::Route;
use crate::services::backend::StaffBackend;
use crate::ui::staff_form::StaffForm;

/// Blank form for adding a member. The record only reaches the roster once
/// the feed pushes it back.
#[component]
pub fn NewStaff() -> Element {
    let backend = use_context::<StaffBackend>();
    let navigator = use_navigator();
    let mut editor = use_signal(|| {
        let mut editor = StaffEditor::default();
        editor.open(&StaffRecord::new_draft());
        editor
    });

    let Some(draft) = editor.read().draft().cloned() else {
        return rsx! {};
    };
    let missing_name = draft.display_name().is_empty();

    rsx! {
        div { class: "mx-auto max-w-3xl space-y-6",
            div {
                h1 { class: "text-2xl font-bold text-gray-900", "Add Staff Member" }
                p { class: "text-sm text-gray-500", "Fill in the details for the new team member." }
            }
            div { class: "rounded-lg border border-gray-200 bg-white p-6 shadow-sm",
                StaffForm {
                    draft,
                    on_field: move |(field, value): (StaffField, String)| {
                        editor.write().set_field(field, &value);
                    },
                    on_emergency: move |(field, value): (EmergencyField, String)| {
                        editor.write().set_emergency_field(field, &value);
                    },
                }
                div { class: "mt-6 flex justify-end gap-2",
                    button {
                        class: "rounded-md border border-gray-300 px-4 py-2 text-sm text-gray-700 hover:bg-gray-50",
                        onclick: move |_| {
                            editor.write().cancel();
                            navigator.push(Route::StaffDirectory {});
                        },
                        "Cancel"
                    }
                    button {
                        class: "rounded-md bg-blue-600 px-4 py-2 text-sm font-medium text-white hover:bg-blue-700 disabled:opacity-50",
                        disabled: missing_name,
                        onclick: move |_| {
                            editor.write().submit_new(backend.updater.as_ref());
                            info!("new staff member submitted");
                            navigator.push(Route::StaffDirectory {});
                        },
                        "Save"
                    }
                }
            }
        }
    }
}
