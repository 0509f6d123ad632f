use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::debug;

use crate::editor::StaffUpdater;
use crate::models::StaffRecord;

/// What a roster source tells its subscribers, in delivery order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RosterEvent {
    /// Full replacement collection.
    Snapshot(Vec<StaffRecord>),
    /// The connection dropped after subscribing; the last snapshot may be
    /// out of date until the source resumes.
    Interrupted(String),
    Resumed,
}

pub type RosterCallback = Box<dyn Fn(RosterEvent) + 'static>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscribeError {
    #[error("roster feed unavailable: {0}")]
    Unavailable(String),
    #[error("roster feed unsupported on this platform: {0}")]
    Unsupported(String),
}

/// Push-based source of full roster snapshots.
pub trait RosterSource {
    fn subscribe(&self, on_change: RosterCallback) -> Result<RosterSubscription, SubscribeError>;
}

/// Scoped registration with a [`RosterSource`]. Released on `unsubscribe`
/// or on drop, whichever comes first.
pub struct RosterSubscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl RosterSubscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn unsubscribe(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for RosterSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for RosterSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterSubscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[derive(Default)]
struct LocalFeed {
    snapshot: Option<Vec<StaffRecord>>,
    subscribers: BTreeMap<u64, Rc<dyn Fn(RosterEvent)>>,
    next_id: u64,
}

/// In-memory roster feed. Backs the offline preview and doubles as the
/// update sink there: saved records are written back and republished.
#[derive(Clone, Default)]
pub struct LocalRosterSource {
    inner: Rc<RefCell<LocalFeed>>,
}

impl LocalRosterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(records: Vec<StaffRecord>) -> Self {
        let source = Self::new();
        source.inner.borrow_mut().snapshot = Some(records);
        source
    }

    pub fn snapshot(&self) -> Option<Vec<StaffRecord>> {
        self.inner.borrow().snapshot.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Replaces the held snapshot and notifies every current subscriber.
    pub fn publish(&self, records: Vec<StaffRecord>) {
        self.inner.borrow_mut().snapshot = Some(records.clone());
        debug!(records = records.len(), "publishing roster");
        self.broadcast(RosterEvent::Snapshot(records));
    }

    /// Tells subscribers the feed went away without touching the snapshot.
    pub fn interrupt(&self, reason: impl Into<String>) {
        self.broadcast(RosterEvent::Interrupted(reason.into()));
    }

    pub fn resume(&self) {
        self.broadcast(RosterEvent::Resumed);
    }

    fn broadcast(&self, event: RosterEvent) {
        let ids: Vec<u64> = self.inner.borrow().subscribers.keys().copied().collect();
        for id in ids {
            // Looked up per delivery so a subscriber released mid-round is skipped.
            let callback = self.inner.borrow().subscribers.get(&id).cloned();
            if let Some(callback) = callback {
                callback(event.clone());
            }
        }
    }

    fn upsert(&self, record: StaffRecord) {
        let mut records = self.snapshot().unwrap_or_default();
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.publish(records);
    }
}

impl RosterSource for LocalRosterSource {
    fn subscribe(&self, on_change: RosterCallback) -> Result<RosterSubscription, SubscribeError> {
        let callback: Rc<dyn Fn(RosterEvent)> = Rc::from(on_change);
        let (id, initial) = {
            let mut feed = self.inner.borrow_mut();
            let id = feed.next_id;
            feed.next_id += 1;
            feed.subscribers.insert(id, Rc::clone(&callback));
            (id, feed.snapshot.clone())
        };

        if let Some(records) = initial {
            callback(RosterEvent::Snapshot(records));
        }

        let feed: Weak<RefCell<LocalFeed>> = Rc::downgrade(&self.inner);
        Ok(RosterSubscription::new(move || {
            if let Some(feed) = feed.upgrade() {
                feed.borrow_mut().subscribers.remove(&id);
            }
        }))
    }
}

impl StaffUpdater for LocalRosterSource {
    fn update(&self, record: StaffRecord) {
        self.upsert(record);
    }
}
