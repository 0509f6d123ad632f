use dioxus::prelude::*;

use crate::editor::{EmergencyField, StaffEditor, StaffField, StaffUpdater};
use crate::models::StaffRecord;
use crate::ui::staff_form::StaffForm;

/// Bridges the editor's save path to the card's `on_update` prop.
struct HandlerSink(EventHandler<StaffRecord>);

impl StaffUpdater for HandlerSink {
    fn update(&self, record: StaffRecord) {
        self.0.call(record);
    }
}

#[component]
pub fn StaffCard(staff: StaffRecord, on_update: EventHandler<StaffRecord>) -> Element {
    let mut editor = use_signal(StaffEditor::default);

    let name = staff.display_name();
    let initials = staff.initials();
    let role = staff.role.clone();
    let status = staff.status.clone();
    let address = staff.address_line();
    let opened_from = staff.clone();

    rsx! {
        div {
            class: "cursor-pointer rounded-lg border border-gray-200 bg-white shadow-sm transition-shadow duration-300 hover:shadow-xl",
            onclick: move |_| editor.write().open(&opened_from),
            div { class: "flex items-center gap-4 px-6 py-5",
                if let Some(src) = staff.profile_image.as_ref() {
                    img { class: "h-16 w-16 rounded-full object-cover", src: "{src}", alt: "{name}" }
                } else {
                    div { class: "flex h-16 w-16 items-center justify-center rounded-full bg-gray-200 text-lg font-semibold text-gray-600",
                        "{initials}"
                    }
                }
                div { class: "min-w-0 flex-1",
                    div { class: "flex items-center gap-2",
                        h3 { class: "truncate text-lg font-semibold text-gray-900", "{name}" }
                        if let Some(status) = status.as_ref() {
                            span { class: format!("rounded px-2 py-0.5 text-xs {}", status.badge_classes()),
                                "{status.as_str()}"
                            }
                        }
                    }
                    if let Some(role) = role.as_ref() {
                        span { class: format!("rounded px-2 py-0.5 text-xs {}", role.badge_classes()),
                            "{role}"
                        }
                    }
                    if let Some(department) = staff.department.as_ref() {
                        p { class: "my-3 text-sm text-gray-600", "{department}" }
                    }
                    div { class: "mt-2 flex flex-col gap-1 text-sm text-gray-500",
                        if let Some(email) = staff.email.as_ref() {
                            span { class: "truncate", "✉ {email}" }
                        }
                        if let Some(phone) = staff.phone.as_ref() {
                            span { "☎ {phone}" }
                        }
                        if let Some(address) = address.as_ref() {
                            span { class: "truncate", "⌖ {address}" }
                        }
                    }
                }
            }
        }
        if editor.read().is_open() {
            StaffEditDialog { editor, current: staff.clone(), on_update }
        }
    }
}

#[component]
fn StaffEditDialog(
    editor: Signal<StaffEditor>,
    current: StaffRecord,
    on_update: EventHandler<StaffRecord>,
) -> Element {
    let snapshot = editor.read().clone();
    let (Some(original), Some(draft)) = (snapshot.original(), snapshot.draft()) else {
        return rsx! {};
    };
    let title = original.display_name();
    let stale = snapshot.is_stale(std::slice::from_ref(&current));

    rsx! {
        div { class: "fixed inset-0 z-40 flex items-center justify-center bg-black/40 p-4",
            div { class: "max-h-[90vh] w-full max-w-3xl overflow-y-auto rounded-lg bg-white p-6 shadow-xl",
                h2 { class: "text-lg font-semibold text-gray-900", "Update Staff: {title}" }
                if stale {
                    p { class: "mt-2 rounded bg-amber-50 px-3 py-2 text-xs text-amber-800",
                        "This record changed after the dialog opened. Saving sends your copy as-is."
                    }
                }
                div { class: "mt-4",
                    StaffForm {
                        draft: draft.clone(),
                        on_field: move |(field, value): (StaffField, String)| {
                            editor.write().set_field(field, &value);
                        },
                        on_emergency: move |(field, value): (EmergencyField, String)| {
                            editor.write().set_emergency_field(field, &value);
                        },
                    }
                }
                div { class: "mt-4 flex justify-end gap-2",
                    button {
                        class: "rounded-md border border-gray-300 px-4 py-2 text-sm text-gray-700 hover:bg-gray-50",
                        onclick: move |_| editor.write().cancel(),
                        "Cancel"
                    }
                    button {
                        class: "rounded-md bg-blue-600 px-4 py-2 text-sm font-medium text-white hover:bg-blue-700 disabled:opacity-50",
                        onclick: move |_| editor.write().save(&HandlerSink(on_update)),
                        "Save"
                    }
                }
            }
        }
    }
}
