// ── Selection and UI state ──
//
// A single typed state container shared by the views. Every setter
// replaces the value (last write wins) and notifies subscribers, even when
// the value did not change. Nothing is persisted.

use serde::Serialize;
use tokio::sync::watch;

use crate::filter::FilterCriteria;
use crate::model::FacilityId;
use crate::stream::StateStream;

pub const DEFAULT_OVERLAY_OPACITY: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiState {
    pub selected: Option<FacilityId>,
    pub show_connections: bool,
    pub show_rail_layer: bool,
    pub show_heatmap: bool,
    pub show_stations: bool,
    pub overlay_opacity: f64,
    pub criteria: FilterCriteria,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected: None,
            show_connections: true,
            show_rail_layer: false,
            show_heatmap: false,
            show_stations: true,
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            criteria: FilterCriteria::default(),
        }
    }
}

/// Shared handle around the current `UiState`.
pub struct UiStore {
    state: watch::Sender<UiState>,
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UiStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(UiState::default());
        Self { state }
    }

    pub fn snapshot(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<UiState> {
        StateStream::new(self.state.subscribe())
    }

    fn set(&self, f: impl FnOnce(&mut UiState)) {
        self.state.send_modify(f);
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn selected(&self) -> Option<FacilityId> {
        self.state.borrow().selected.clone()
    }

    pub fn set_selected(&self, id: Option<FacilityId>) {
        self.set(|s| s.selected = id);
    }

    // ── Layers ───────────────────────────────────────────────────────

    pub fn show_connections(&self) -> bool {
        self.state.borrow().show_connections
    }

    pub fn set_show_connections(&self, on: bool) {
        self.set(|s| s.show_connections = on);
    }

    pub fn show_rail_layer(&self) -> bool {
        self.state.borrow().show_rail_layer
    }

    pub fn set_show_rail_layer(&self, on: bool) {
        self.set(|s| s.show_rail_layer = on);
    }

    pub fn show_heatmap(&self) -> bool {
        self.state.borrow().show_heatmap
    }

    pub fn set_show_heatmap(&self, on: bool) {
        self.set(|s| s.show_heatmap = on);
    }

    pub fn show_stations(&self) -> bool {
        self.state.borrow().show_stations
    }

    pub fn set_show_stations(&self, on: bool) {
        self.set(|s| s.show_stations = on);
    }

    pub fn overlay_opacity(&self) -> f64 {
        self.state.borrow().overlay_opacity
    }

    pub fn set_overlay_opacity(&self, opacity: f64) {
        self.set(|s| s.overlay_opacity = opacity);
    }

    // ── Filter criteria ──────────────────────────────────────────────

    pub fn criteria(&self) -> FilterCriteria {
        self.state.borrow().criteria.clone()
    }

    pub fn set_criteria(&self, criteria: FilterCriteria) {
        self.set(|s| s.criteria = criteria);
    }

    /// Edit the criteria in place (toggle a type, change the search, ...).
    pub fn update_criteria(&self, f: impl FnOnce(&mut FilterCriteria)) {
        self.set(|s| f(&mut s.criteria));
    }
}
