//! Reactive data layer between `hivemap-api` and the front ends (CLI / TUI).
//!
//! - **[`Dashboard`]**: facade owning one session. [`load()`](Dashboard::load)
//!   runs the single startup fetch; [`Dashboard::oneshot()`] wraps load plus
//!   one closure for CLI invocations.
//!
//! - **[`FacilityStore`]**: `DashMap` index plus `tokio::sync::watch`
//!   snapshot, moving out of `Loading` exactly once.
//!
//! - **[`filter`]**: the pure predicate engine over [`FilterCriteria`].
//!
//! - **[`UiStore`]**: selection, layer toggles and filter criteria, with
//!   subscriber notification on every set.
//!
//! - **[`terminal`] / [`telemetry`]**: declarative per-type control panels
//!   and the simulated signals behind them.
//!
//! - **[`overlay`] / [`export`]**: heatmap, connections, clustering, rail
//!   stations, critical alerts and CSV export.

pub mod config;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod locale;
pub mod model;
pub mod overlay;
pub mod store;
pub mod stream;
pub mod telemetry;
pub mod terminal;
pub mod ui_state;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::DashboardConfig;
pub use convert::LoadReport;
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use filter::FilterCriteria;
pub use locale::Locale;
pub use store::{FacilityStore, LoadState, Snapshot};
pub use stream::StateStream;
pub use telemetry::{FeedCommand, Readings, Telemetry, TelemetryFeed};
pub use terminal::{TerminalSchema, TerminalSession};
pub use ui_state::{UiState, UiStore};

pub use model::{
    Facility, FacilityId, FacilityStatus, FacilityType, HistoryEntry, Position, SourceRecord,
};

// The fixture source type is part of `DashboardConfig`.
pub use hivemap_api::FixtureSource;
