use dioxus::prelude::*;

use crate::editor::{EmergencyField, StaffField};
use crate::models::StaffRecord;

const INPUT_CLASS: &str = "w-full rounded-md border border-gray-300 px-3 py-2 text-sm focus:outline-none focus:ring-2 focus:ring-blue-500";

/// Field grid shared by the edit dialog and the new-member page. The
/// emergency contact block only shows when the draft carries one.
#[component]
pub fn StaffForm(
    draft: StaffRecord,
    on_field: EventHandler<(StaffField, String)>,
    on_emergency: EventHandler<(EmergencyField, String)>,
) -> Element {
    let contact = draft.emergency_contact.clone();

    rsx! {
        div { class: "grid grid-cols-1 gap-4 md:grid-cols-2",
            for field in StaffField::ALL {
                div {
                    key: "{field.label()}",
                    class: if field.is_wide() { "md:col-span-2" } else { "" },
                    label { class: "mb-1 block text-sm font-medium text-gray-700", "{field.label()}" }
                    if field.commits_on_change() {
                        input {
                            r#type: "text",
                            class: INPUT_CLASS,
                            value: field.read(&draft),
                            onchange: move |evt: FormEvent| on_field.call((field, evt.value())),
                        }
                    } else {
                        input {
                            r#type: "text",
                            class: INPUT_CLASS,
                            value: field.read(&draft),
                            oninput: move |evt: FormEvent| on_field.call((field, evt.value())),
                        }
                    }
                }
            }
            if let Some(contact) = contact {
                for field in EmergencyField::ALL {
                    div { key: "{field.label()}",
                        label { class: "mb-1 block text-sm font-medium text-gray-700", "{field.label()}" }
                        input {
                            r#type: "text",
                            class: INPUT_CLASS,
                            value: field.read(&contact),
                            oninput: move |evt: FormEvent| on_emergency.call((field, evt.value())),
                        }
                    }
                }
            }
        }
    }
}
