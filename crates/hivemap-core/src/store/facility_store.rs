// ── Reactive facility collection ──
//
// O(1) id lookups through `DashMap` and push-based change notification
// through `watch` channels. The store transitions out of `Loading` exactly
// once per session.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::debug;

use crate::convert::LoadReport;
use crate::filter::{self, FilterCriteria};
use crate::model::{Facility, FacilityId};
use crate::stream::StateStream;

/// Ordered, shared view of every loaded facility.
pub type Snapshot = Arc<Vec<Arc<Facility>>>;

/// Lifecycle of the one-shot startup load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded(LoadReport),
    /// The load failed; `message` is the fixed, localized text shown to users.
    Failed {
        message: String,
    },
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Central store for the facility fixture.
pub struct FacilityStore {
    by_id: DashMap<FacilityId, Arc<Facility>>,
    snapshot: watch::Sender<Snapshot>,
    state: watch::Sender<LoadState>,
}

impl Default for FacilityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FacilityStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (state, _) = watch::channel(LoadState::Loading);

        Self {
            by_id: DashMap::new(),
            snapshot,
            state,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Store the loaded collection. Returns `false` (and changes nothing)
    /// if the store already left `Loading`.
    pub fn populate(&self, facilities: Vec<Facility>, report: LoadReport) -> bool {
        self.state.send_if_modified(|state| {
            if !state.is_loading() {
                return false;
            }
            let shared: Vec<Arc<Facility>> = facilities.into_iter().map(Arc::new).collect();
            for facility in &shared {
                self.by_id
                    .insert(facility.id.clone(), Arc::clone(facility));
            }
            // `send_modify` updates unconditionally, even with zero receivers.
            self.snapshot.send_modify(|snap| *snap = Arc::new(shared));
            *state = LoadState::Loaded(report);
            debug!(count = self.by_id.len(), "facility store populated");
            true
        })
    }

    /// Record a failed load. The collection stays empty.
    pub fn fail(&self, message: impl Into<String>) -> bool {
        let message = message.into();
        self.state.send_if_modified(|state| {
            if !state.is_loading() {
                return false;
            }
            *state = LoadState::Failed { message };
            true
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Current snapshot (cheap `Arc` clone). Empty until loaded.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    pub fn get(&self, id: &FacilityId) -> Option<Arc<Facility>> {
        self.by_id.get(id).map(|r| Arc::clone(r.value()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Facilities matching `criteria`, in fixture order.
    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<Arc<Facility>> {
        let snap = self.snapshot();
        filter::apply(Some(snap.as_slice()), criteria)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> StateStream<Snapshot> {
        StateStream::new(self.snapshot.subscribe())
    }

    pub fn subscribe_state(&self) -> StateStream<LoadState> {
        StateStream::new(self.state.subscribe())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{FacilityStatus, FacilityType, Position, SourceRecord};

    fn facility(id: &str) -> Facility {
        Facility {
            id: id.into(),
            name: id.to_uppercase(),
            kind: FacilityType::Bridge,
            status: FacilityStatus::Active,
            country: "DK".into(),
            position: Position::new(55.6, 12.6).unwrap(),
            description: None,
            history: Vec::new(),
            info_url: None,
            source: SourceRecord::new(),
        }
    }

    fn report(accepted: usize) -> LoadReport {
        LoadReport {
            accepted,
            rejected: 0,
        }
    }

    #[test]
    fn starts_loading_and_empty() {
        let store = FacilityStore::new();
        assert!(store.is_loading());
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn populate_indexes_and_snapshots_in_order() {
        let store = FacilityStore::new();
        assert!(store.populate(vec![facility("b"), facility("a")], report(2)));

        assert_eq!(store.state(), LoadState::Loaded(report(2)));
        let snap = store.snapshot();
        let ids: Vec<_> = snap.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(store.get(&"a".into()).unwrap().name, "A");
        assert!(store.get(&"zz".into()).is_none());
    }

    #[test]
    fn transitions_only_once() {
        let store = FacilityStore::new();
        assert!(store.fail("Failed to load facilities"));
        assert!(!store.populate(vec![facility("a")], report(1)));
        assert!(!store.fail("again"));

        assert_eq!(
            store.state().error_message(),
            Some("Failed to load facilities")
        );
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_the_loaded_snapshot() {
        let store = FacilityStore::new();
        let mut facilities = store.subscribe();
        let mut state = store.subscribe_state();
        assert!(state.current().is_loading());

        store.populate(vec![facility("x")], report(1));

        let snap = facilities.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert!(matches!(state.changed().await.unwrap(), LoadState::Loaded(_)));
        assert_eq!(state.latest(), store.state());
    }
}
