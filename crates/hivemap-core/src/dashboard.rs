// ── Dashboard facade ──
//
// Full lifecycle of one dashboard session: owns the facility store and the
// UI state, runs the one-shot load, and derives every view the front ends
// need. Cheaply cloneable; clones share state.

use std::sync::Arc;

use hivemap_api::{FixtureClient, TransportConfig};
use tracing::debug;

use crate::config::DashboardConfig;
use crate::convert::LoadReport;
use crate::error::CoreError;
use crate::export;
use crate::filter::FilterCriteria;
use crate::locale::Locale;
use crate::model::{Facility, FacilityId};
use crate::overlay::{self, Cluster, Connection, HeatPoint};
use crate::store::{self, FacilityStore, Snapshot};
use crate::telemetry::TelemetryFeed;
use crate::terminal::TerminalSession;
use crate::ui_state::UiStore;

#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    store: FacilityStore,
    ui: UiStore,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            inner: Arc::new(DashboardInner {
                config,
                store: FacilityStore::new(),
                ui: UiStore::new(),
            }),
        }
    }

    /// Fetch the fixture once. A second call fails without refetching.
    pub async fn load(&self) -> Result<LoadReport, CoreError> {
        let config = &self.inner.config;
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = match FixtureClient::new(config.source.clone(), &transport) {
            Ok(client) => client,
            Err(e) => {
                self.inner.store.fail(config.locale.load_error());
                return Err(e.into());
            }
        };
        store::load_into(&self.inner.store, &client, config.locale).await
    }

    // ── One-shot convenience ─────────────────────────────────────────

    /// Load, then run `f` against the loaded dashboard. Used by the CLI.
    pub async fn oneshot<F, Fut, T>(config: DashboardConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Dashboard) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let dashboard = Dashboard::new(config);
        let report = dashboard.load().await?;
        debug!(accepted = report.accepted, "oneshot dashboard ready");
        f(dashboard).await
    }

    // ── State ────────────────────────────────────────────────────────

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn locale(&self) -> Locale {
        self.inner.config.locale
    }

    pub fn store(&self) -> &FacilityStore {
        &self.inner.store
    }

    pub fn ui(&self) -> &UiStore {
        &self.inner.ui
    }

    // ── Facilities ───────────────────────────────────────────────────

    pub fn facilities(&self) -> Snapshot {
        self.inner.store.snapshot()
    }

    /// Facilities matching the criteria held in UI state.
    pub fn visible(&self) -> Vec<Arc<Facility>> {
        self.filtered(&self.inner.ui.criteria())
    }

    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<Arc<Facility>> {
        self.inner.store.filtered(criteria)
    }

    pub fn get(&self, id: &FacilityId) -> Result<Arc<Facility>, CoreError> {
        if self.inner.store.is_loading() {
            return Err(CoreError::NotLoaded);
        }
        self.inner
            .store
            .get(id)
            .ok_or_else(|| CoreError::FacilityNotFound {
                identifier: id.to_string(),
            })
    }

    /// The facility currently selected in UI state, if it still exists.
    pub fn selected(&self) -> Option<Arc<Facility>> {
        self.inner
            .ui
            .selected()
            .and_then(|id| self.inner.store.get(&id))
    }

    // ── Overlays ─────────────────────────────────────────────────────

    pub fn connections(&self) -> Vec<Connection> {
        overlay::connections(&self.facilities(), &self.inner.config.connections)
    }

    /// Clusters over the visible facilities.
    pub fn clusters(&self) -> Vec<Cluster> {
        overlay::cluster(&self.visible(), self.inner.config.cluster_cell_degrees)
    }

    pub fn clusters_with_cell(&self, cell_degrees: f64) -> Vec<Cluster> {
        overlay::cluster(&self.visible(), cell_degrees)
    }

    pub fn heat_points(&self) -> Vec<HeatPoint> {
        overlay::heat_points(&self.facilities())
    }

    pub fn critical(&self) -> Vec<Arc<Facility>> {
        overlay::critical_facilities(&self.facilities())
    }

    pub fn has_critical_alert(&self) -> bool {
        overlay::has_critical(&self.facilities())
    }

    // ── Export ───────────────────────────────────────────────────────

    /// CSV of every loaded facility record, ignoring the active filter.
    pub fn export_csv(&self) -> Result<String, CoreError> {
        export::to_csv(&export::facility_rows(&self.facilities())?)
    }

    // ── Terminals ────────────────────────────────────────────────────

    pub fn open_terminal(&self, id: &FacilityId) -> Result<TerminalSession, CoreError> {
        let facility = self.get(id)?;
        Ok(TerminalSession::open(&facility))
    }

    /// Start the telemetry feed for an open terminal. Must be called inside
    /// a tokio runtime; dropping the feed stops it.
    pub fn spawn_feed(&self, session: &TerminalSession) -> TelemetryFeed {
        TelemetryFeed::spawn(session.telemetry(), session.schema().tick)
    }
}
