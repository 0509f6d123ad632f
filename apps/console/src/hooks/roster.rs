use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures::channel::mpsc::UnboundedReceiver;
use futures::StreamExt;
use tracing::{info, warn};

use crate::services::backend::StaffBackend;
use crate::services::feed::RosterEvent;
use crate::state::use_app_actions;

/// Subscribes the calling component to the staff roster for as long as it
/// stays mounted. Snapshots replace the roster in app state; interruptions
/// and reconnects update the feed status.
pub fn use_roster_feed() {
    let actions = use_app_actions();
    let backend = use_context::<StaffBackend>();

    let feed = use_coroutine(move |mut rx: UnboundedReceiver<RosterEvent>| async move {
        while let Some(event) = rx.next().await {
            actions.apply_roster_event(event);
        }
    });

    let subscription = use_hook(move || {
        let sender = feed.clone();
        let subscribed = backend
            .source
            .subscribe(Box::new(move |event| sender.send(event)));

        let guard = match subscribed {
            Ok(guard) => {
                info!("staff roster subscription active");
                Some(guard)
            }
            Err(err) => {
                warn!(%err, "staff roster subscription failed");
                feed.send(RosterEvent::Interrupted(err.to_string()));
                None
            }
        };
        Rc::new(RefCell::new(guard))
    });

    use_drop(move || {
        if let Some(mut guard) = subscription.borrow_mut().take() {
            guard.unsubscribe();
            info!("staff roster subscription released");
        }
    });
}

