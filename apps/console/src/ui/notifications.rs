use dioxus::prelude::*;

use crate::roster::FeedStatus;
use crate::state::{use_app_actions, use_app_state};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
}

impl ToastKind {
    fn accent_classes(self) -> (&'static str, &'static str) {
        match self {
            Self::Success => ("border-emerald-500 bg-emerald-50", "text-emerald-700"),
            Self::Error => ("border-red-500 bg-red-50", "text-red-700"),
            Self::Warning => ("border-amber-500 bg-amber-50", "text-amber-700"),
        }
    }
}

#[component]
pub fn Toast(
    kind: ToastKind,
    title: String,
    message: String,
    #[props(default)] details: Vec<(String, String)>,
    on_close: Option<EventHandler<MouseEvent>>,
) -> Element {
    let (container_class, accent_text) = kind.accent_classes();

    rsx! {
        div { class: format!("pointer-events-auto rounded-lg border-l-4 p-4 shadow-lg {}", container_class),
            div { class: "flex items-start justify-between gap-4",
                div { class: "space-y-1",
                    h3 { class: format!("text-sm font-semibold {}", accent_text), "{title}" }
                    p { class: "text-xs text-gray-700", "{message}" }
                    if !details.is_empty() {
                        ul { class: "mt-2 space-y-1 text-[11px] text-gray-500",
                            for (label, value) in details.iter() {
                                li {
                                    span { class: "font-medium", "{label}: " }
                                    span { class: "font-mono break-all", "{value}" }
                                }
                            }
                        }
                    }
                }
                if let Some(handler) = on_close {
                    button {
                        class: "rounded bg-gray-200 px-2 py-1 text-[11px] text-gray-600 transition hover:bg-gray-300",
                        onclick: move |evt| handler.call(evt),
                        "Dismiss"
                    }
                }
            }
        }
    }
}

#[component]
pub fn NotificationCenter() -> Element {
    let actions = use_app_actions();
    let snapshot = use_app_state().read().clone();
    let operation = snapshot.operation;

    let mut toasts: Vec<Element> = Vec::new();

    if let Some(error) = operation.error {
        let mut details = Vec::new();
        if let Some(status) = operation.last_status {
            details.push(("HTTP status".to_string(), status.to_string()));
        }
        let title = operation
            .context
            .clone()
            .unwrap_or_else(|| "Request failed".to_string());
        toasts.push(rsx! {
            Toast {
                key: "operation-error",
                kind: ToastKind::Error,
                title,
                message: error,
                details,
                on_close: move |_| actions.clear_operation_status(),
            }
        });
    } else if let Some(message) = operation.last_message {
        toasts.push(rsx! {
            Toast {
                key: "operation-success",
                kind: ToastKind::Success,
                title: "Saved".to_string(),
                message,
                on_close: move |_| actions.clear_operation_status(),
            }
        });
    }

    // Only worth a toast when there is a roster on screen that may now be
    // out of date; an empty listing explains itself.
    if let FeedStatus::Unavailable(reason) = &snapshot.staff.feed {
        if !snapshot.staff.roster.is_empty() {
            let details = snapshot
                .staff
                .last_synced_label()
                .map(|at| vec![("Last synced".to_string(), at)])
                .unwrap_or_default();
            toasts.push(rsx! {
                Toast {
                    key: "feed-unavailable",
                    kind: ToastKind::Warning,
                    title: "Live updates paused".to_string(),
                    message: reason.clone(),
                    details,
                }
            });
        }
    }

    if toasts.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div { class: "pointer-events-none fixed right-4 top-4 z-50 flex w-80 flex-col gap-3",
            for toast in toasts {
                {toast}
            }
        }
    }
}
