use dioxus::prelude::*;
use tracing::warn;

use crate::session::{forget_user, persist_user, restore_user, SessionUser};
use crate::state::SessionSignal;

#[cfg(target_arch = "wasm32")]
use {crate::API_CLIENT, tracing::info};

/// Starts the session once at mount: a user persisted by an earlier visit
/// wins, otherwise the API is asked who is signed in.
pub fn use_session_bootstrap(session: SessionSignal) {
    use_future(move || async move {
        if session.read().is_signed_in() {
            return;
        }

        if let Some(user) = restore_user() {
            start_session(session, user);
            return;
        }

        #[cfg(target_arch = "wasm32")]
        {
            let Some(client) = API_CLIENT.get().cloned() else {
                warn!("no API client, session stays anonymous");
                return;
            };

            match client.current_user().await {
                Ok(envelope) => match envelope.data {
                    Some(user) => {
                        info!(user = %user.name, "session user loaded");
                        start_session(session, user);
                    }
                    None => warn!("session/me returned no user"),
                },
                Err(err) => warn!(%err, "failed to load session user"),
            }
        }
    });
}

pub fn start_session(mut session: SessionSignal, user: SessionUser) {
    if let Err(err) = persist_user(&user) {
        warn!(%err, "session user not persisted");
    }
    session.write().begin(user);
}

pub fn end_session(mut session: SessionSignal) {
    forget_user();
    session.write().end();
}
