use dioxus::prelude::*;
use dioxus_signals::Signal;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::api::ClientError;
use crate::models::StaffRecord;
use crate::roster::{FeedStatus, FilterChoice, StaffFilter};
use crate::services::feed::RosterEvent;
use crate::session::SessionContext;

pub type AppSignal = Signal<AppState>;
pub type SessionSignal = Signal<SessionContext>;

#[derive(Clone, Debug, Default)]
pub struct StaffDirectoryState {
    /// Latest full snapshot, in delivery order.
    pub roster: Vec<StaffRecord>,
    pub feed: FeedStatus,
    pub filter: StaffFilter,
    pub last_synced_ms: Option<i64>,
    pub snapshots_received: u64,
}

impl StaffDirectoryState {
    pub fn apply_snapshot(&mut self, records: Vec<StaffRecord>, received_at_ms: i64) {
        self.roster = records;
        self.feed = FeedStatus::Live;
        self.last_synced_ms = Some(received_at_ms);
        self.snapshots_received += 1;
    }

    /// A failed subscription leaves the roster untouched; an empty roster
    /// then renders as "unavailable" rather than "no staff".
    pub fn mark_unavailable(&mut self, reason: String) {
        self.feed = FeedStatus::Unavailable(reason);
    }

    /// A reconnect only counts as live once a snapshot has been seen;
    /// before that the listing keeps saying it is connecting.
    pub fn mark_resumed(&mut self) {
        self.feed = if self.snapshots_received > 0 {
            FeedStatus::Live
        } else {
            FeedStatus::Connecting
        };
    }

    pub fn apply_event(&mut self, event: RosterEvent, received_at_ms: i64) {
        match event {
            RosterEvent::Snapshot(records) => self.apply_snapshot(records, received_at_ms),
            RosterEvent::Interrupted(reason) => self.mark_unavailable(reason),
            RosterEvent::Resumed => self.mark_resumed(),
        }
    }

    pub fn record(&self, id: &str) -> Option<&StaffRecord> {
        self.roster.iter().find(|record| record.id == id)
    }

    pub fn last_synced_label(&self) -> Option<String> {
        let millis = self.last_synced_ms?;
        let at = OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()?;
        at.format(format_description!("[hour]:[minute]:[second] UTC"))
            .ok()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationState {
    pub last_message: Option<String>,
    pub error: Option<String>,
    pub last_status: Option<u16>,
    pub context: Option<String>,
}

impl OperationState {
    pub fn succeed(&mut self, message: String) {
        *self = Self {
            last_message: Some(message),
            ..Self::default()
        };
    }

    pub fn fail(&mut self, context: Option<String>, message: String, status: Option<u16>) {
        *self = Self {
            error: Some(message),
            last_status: status,
            context,
            ..Self::default()
        };
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub staff: StaffDirectoryState,
    pub operation: OperationState,
}

#[derive(Clone, Copy)]
pub struct AppActions {
    state: AppSignal,
}

impl AppActions {
    pub fn new(state: AppSignal) -> Self {
        Self { state }
    }

    pub fn apply_roster_event(&self, event: RosterEvent) {
        let mut state = self.state;
        let now_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        state.write().staff.apply_event(event, now_ms);
    }

    pub fn set_search_term(&self, term: String) {
        let mut state = self.state;
        state.write().staff.filter.search_term = term;
    }

    pub fn select_department(&self, value: &str) {
        let mut state = self.state;
        state.write().staff.filter.department = FilterChoice::from_select_value(value);
    }

    pub fn select_role(&self, value: &str) {
        let mut state = self.state;
        state.write().staff.filter.role = FilterChoice::from_select_value(value);
    }

    pub fn clear_filters(&self) {
        let mut state = self.state;
        state.write().staff.filter.clear();
    }

    pub fn set_operation_success(&self, message: String) {
        let mut state = self.state;
        state.write().operation.succeed(message);
    }

    pub fn set_operation_error(&self, context: &str, message: String) {
        let mut state = self.state;
        state
            .write()
            .operation
            .fail(Some(context.to_string()), message, None);
    }

    pub fn record_client_failure(&self, context: &str, err: &ClientError) {
        let status = err.status().map(|status| status.as_u16());
        let message = match status {
            Some(code) => http_status_advice(code).to_string(),
            None => err.to_string(),
        };
        tracing::error!(%context, ?status, %err, "staff api call failed");

        let mut state = self.state;
        state
            .write()
            .operation
            .fail(Some(context.to_string()), message, status);
    }

    pub fn clear_operation_status(&self) {
        let mut state = self.state;
        state.write().operation = OperationState::default();
    }
}

fn http_status_advice(status: u16) -> &'static str {
    match status {
        401 => "401 Unauthorized: your session may have expired, sign in again.",
        403 => "403 Forbidden: your role cannot change staff records.",
        404 => "404 Not Found: the record may have been removed by someone else.",
        409 => "409 Conflict: the record changed since you opened it, reopen and retry.",
        429 => "429 Too Many Requests: wait a moment before retrying.",
        _ => "Request failed, check the API logs for details.",
    }
}

pub fn use_app_state() -> AppSignal {
    use_context::<AppSignal>()
}

pub fn use_app_actions() -> AppActions {
    AppActions::new(use_app_state())
}

pub fn use_session() -> SessionSignal {
    use_context::<SessionSignal>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::staff::sample_roster;
    use crate::roster::ListingState;

    #[test]
    fn snapshot_replaces_rather_than_merges() {
        let mut staff = StaffDirectoryState::default();
        staff.apply_snapshot(sample_roster(), 1_000);
        staff.apply_snapshot(vec![StaffRecord::blank("only")], 2_000);

        assert_eq!(staff.roster.len(), 1);
        assert_eq!(staff.feed, FeedStatus::Live);
        assert_eq!(staff.last_synced_ms, Some(2_000));
        assert_eq!(staff.snapshots_received, 2);
        assert!(staff.record("only").is_some());
        assert!(staff.record("1").is_none());
    }

    #[test]
    fn unavailable_feed_keeps_last_roster() {
        let mut staff = StaffDirectoryState::default();
        staff.apply_snapshot(sample_roster(), 0);
        staff.mark_unavailable("stream closed".into());
        assert_eq!(staff.roster.len(), sample_roster().len());
        assert_eq!(staff.feed, FeedStatus::Unavailable("stream closed".into()));
    }

    #[test]
    fn stream_drop_after_data_marks_feed_unavailable_then_live_again() {
        let mut staff = StaffDirectoryState::default();
        staff.apply_event(RosterEvent::Snapshot(sample_roster()), 10);
        staff.apply_event(RosterEvent::Interrupted("heartbeat timed out".into()), 20);
        assert_eq!(staff.feed, FeedStatus::Unavailable("heartbeat timed out".into()));
        assert_eq!(staff.roster.len(), sample_roster().len());
        assert_eq!(staff.last_synced_ms, Some(10));

        staff.apply_event(RosterEvent::Resumed, 30);
        assert_eq!(staff.feed, FeedStatus::Live);
    }

    #[test]
    fn stream_that_never_delivers_stops_looking_like_loading() {
        let mut staff = StaffDirectoryState::default();
        staff.apply_event(RosterEvent::Interrupted("connect failed".into()), 0);
        assert_eq!(
            ListingState::resolve(&staff.feed, staff.roster.len(), 0),
            ListingState::Unavailable("connect failed".into())
        );

        staff.apply_event(RosterEvent::Resumed, 1);
        assert_eq!(staff.feed, FeedStatus::Connecting);
    }

    #[test]
    fn last_synced_label_formats_utc_clock() {
        let mut staff = StaffDirectoryState::default();
        assert_eq!(staff.last_synced_label(), None);
        staff.apply_snapshot(Vec::new(), 3_723_000);
        assert_eq!(staff.last_synced_label().as_deref(), Some("01:02:03 UTC"));
    }

    #[test]
    fn operation_outcomes_replace_each_other() {
        let mut op = OperationState::default();
        op.fail(Some("Update staff".into()), "boom".into(), Some(500));
        op.succeed("Saved".into());
        assert_eq!(
            op,
            OperationState {
                last_message: Some("Saved".into()),
                ..OperationState::default()
            }
        );
    }
}
