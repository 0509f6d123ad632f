//! Picks the roster feed and update sink for the current platform: the live
//! event stream plus HTTP writes in the browser, the in-memory fixture feed
//! everywhere else.

use std::rc::Rc;

use crate::editor::StaffUpdater;
use crate::services::feed::RosterSource;
use crate::state::AppActions;

#[cfg(not(target_arch = "wasm32"))]
use crate::{fixtures::staff::sample_roster, services::feed::LocalRosterSource};

#[cfg(target_arch = "wasm32")]
use {
    crate::api::LegalFlowClient,
    crate::models::{parse_snapshot, StaffRecord},
    crate::services::feed::{RosterCallback, RosterEvent, RosterSubscription, SubscribeError},
    crate::services::sse::{open_stream, SseError, StreamEvent, StreamOptions},
    crate::API_CLIENT,
    tracing::{debug, info, warn},
};

#[derive(Clone)]
pub struct StaffBackend {
    pub source: Rc<dyn RosterSource>,
    pub updater: Rc<dyn StaffUpdater>,
}

impl PartialEq for StaffBackend {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.source, &other.source) && Rc::ptr_eq(&self.updater, &other.updater)
    }
}

impl StaffBackend {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn for_platform(_actions: AppActions) -> Self {
        let local = LocalRosterSource::with_snapshot(sample_roster());
        Self {
            source: Rc::new(local.clone()),
            updater: Rc::new(local),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn for_platform(actions: AppActions) -> Self {
        let client = API_CLIENT.get().cloned();
        let stream_url = client.as_ref().map(LegalFlowClient::roster_stream_url);
        let options = client
            .as_ref()
            .map(|client| StreamOptions::with_heartbeat(client.config().sse_timeout))
            .unwrap_or_default();

        Self {
            source: Rc::new(SseRosterSource {
                url: stream_url,
                options,
            }),
            updater: Rc::new(RemoteStaffUpdater { client, actions }),
        }
    }
}

/// Roster feed over server-sent events; each message carries the whole
/// collection as a JSON array.
#[cfg(target_arch = "wasm32")]
pub struct SseRosterSource {
    url: Option<String>,
    options: StreamOptions,
}

#[cfg(target_arch = "wasm32")]
impl RosterSource for SseRosterSource {
    fn subscribe(&self, on_change: RosterCallback) -> Result<RosterSubscription, SubscribeError> {
        let Some(url) = self.url.as_deref() else {
            return Err(SubscribeError::Unavailable(
                "API client is not initialised".into(),
            ));
        };

        let listener = Box::new(move |event: StreamEvent| match event {
            StreamEvent::Opened => {
                debug!("roster stream open");
                on_change(RosterEvent::Resumed);
            }
            StreamEvent::Dropped(reason) => {
                warn!(%reason, "roster stream error");
                on_change(RosterEvent::Interrupted(reason));
            }
            StreamEvent::Frame { .. } if event.is_ping() => {}
            StreamEvent::Frame { data, .. } => match parse_snapshot(&data) {
                Ok(records) => on_change(RosterEvent::Snapshot(records)),
                Err(err) => warn!(%err, "ignoring undecodable roster message"),
            },
        });

        let handle = open_stream(url, self.options, listener).map_err(|err| match err {
            SseError::EventSourceInit(reason) => SubscribeError::Unavailable(reason),
            SseError::Unsupported => SubscribeError::Unsupported("EventSource is missing".into()),
        })?;
        info!(%url, "subscribed to roster stream");

        Ok(RosterSubscription::new(move || {
            handle.close();
            info!("roster stream released");
        }))
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy)]
enum WriteKind {
    Update,
    Create,
}

#[cfg(target_arch = "wasm32")]
impl WriteKind {
    fn context(self) -> &'static str {
        match self {
            Self::Update => "Update staff member",
            Self::Create => "Add staff member",
        }
    }
}

/// Sends saved records to the API without waiting; outcomes surface as
/// notifications, and the roster itself only changes via the feed.
#[cfg(target_arch = "wasm32")]
pub struct RemoteStaffUpdater {
    client: Option<LegalFlowClient>,
    actions: AppActions,
}

#[cfg(target_arch = "wasm32")]
impl RemoteStaffUpdater {
    fn dispatch(&self, kind: WriteKind, record: StaffRecord) {
        let actions = self.actions;
        let Some(client) = self.client.clone() else {
            actions.set_operation_error(kind.context(), "API client is not initialised".into());
            return;
        };

        wasm_bindgen_futures::spawn_local(async move {
            let name = record.display_name();
            let result = match kind {
                WriteKind::Update => client.update_staff(&record).await,
                WriteKind::Create => client.create_staff(&record).await,
            };
            match result {
                Ok(_) => {
                    info!(id = %record.id, "staff record saved");
                    actions.set_operation_success(format!("Saved {name}"));
                }
                Err(err) => actions.record_client_failure(kind.context(), &err),
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
impl StaffUpdater for RemoteStaffUpdater {
    fn update(&self, record: StaffRecord) {
        self.dispatch(WriteKind::Update, record);
    }

    fn create(&self, record: StaffRecord) {
        self.dispatch(WriteKind::Create, record);
    }
}
