// ── Runtime dashboard configuration ──
//
// Describes where the fixture comes from and how overlays are derived.
// Never touches disk; the CLI/TUI build a `DashboardConfig` from their
// profile and flags and hand it in.

use std::path::PathBuf;
use std::time::Duration;

use hivemap_api::FixtureSource;

use crate::locale::Locale;
use crate::overlay;

/// Fixture path used when nothing else is configured.
pub const DEFAULT_SOURCE: &str = "data/facilities.json";

/// Grid cell size for clustering, in degrees.
pub const DEFAULT_CLUSTER_CELL: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Remote URL or local path of the facility fixture.
    pub source: FixtureSource,
    /// Fetch timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub locale: Locale,
    /// Facility id pairs drawn by the connection overlay.
    pub connections: Vec<(String, String)>,
    pub cluster_cell_degrees: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: FixtureSource::Local(PathBuf::from(DEFAULT_SOURCE)),
            timeout: None,
            locale: Locale::default(),
            connections: overlay::default_connection_pairs(),
            cluster_cell_degrees: DEFAULT_CLUSTER_CELL,
        }
    }
}
