// ── Map overlays ──
//
// Pure derivations over a facility slice: heatmap weights, resolved
// connection lines, grid clusters, the static rail stations and the
// critical-alert check. Drawing them is the front end's job.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::model::{Facility, FacilityId, Position};

pub const CRITICAL_INTENSITY: f64 = 1.0;
pub const NORMAL_INTENSITY: f64 = 0.3;

/// Connection pairs drawn when no profile overrides them.
pub const DEFAULT_CONNECTIONS: &[(&str, &str)] = &[
    ("power-1", "base-1"),
    ("base-1", "server-1"),
    ("power-1", "server-1"),
];

// ── Heatmap ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub position: Position,
    pub intensity: f64,
}

pub fn heat_points(facilities: &[Arc<Facility>]) -> Vec<HeatPoint> {
    facilities
        .iter()
        .map(|f| HeatPoint {
            position: f.position,
            intensity: if f.is_critical() {
                CRITICAL_INTENSITY
            } else {
                NORMAL_INTENSITY
            },
        })
        .collect()
}

// ── Connections ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub from: FacilityId,
    pub to: FacilityId,
    pub from_position: Position,
    pub to_position: Position,
}

/// Resolve id pairs against `facilities`. Pairs naming an unknown id are
/// skipped.
pub fn connections(facilities: &[Arc<Facility>], pairs: &[(String, String)]) -> Vec<Connection> {
    let index: HashMap<&str, &Facility> = facilities
        .iter()
        .map(|f| (f.id.as_str(), f.as_ref()))
        .collect();

    pairs
        .iter()
        .filter_map(|(from, to)| {
            let a = index.get(from.as_str())?;
            let b = index.get(to.as_str())?;
            Some(Connection {
                from: a.id.clone(),
                to: b.id.clone(),
                from_position: a.position,
                to_position: b.position,
            })
        })
        .collect()
}

pub fn default_connection_pairs() -> Vec<(String, String)> {
    DEFAULT_CONNECTIONS
        .iter()
        .map(|(a, b)| ((*a).to_owned(), (*b).to_owned()))
        .collect()
}

// ── Clustering ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub center: Position,
    pub members: Vec<FacilityId>,
    pub critical: usize,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Group facilities into square grid cells of `cell_degrees`.
///
/// Clusters appear in the order their first member appears. A cell size
/// that is not positive puts every facility in its own cluster.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn cluster(facilities: &[Arc<Facility>], cell_degrees: f64) -> Vec<Cluster> {
    struct Acc {
        lat_sum: f64,
        lon_sum: f64,
        members: Vec<FacilityId>,
        critical: usize,
    }

    let mut order: Vec<(i64, i64)> = Vec::new();
    let mut cells: HashMap<(i64, i64), Acc> = HashMap::new();

    for (i, facility) in facilities.iter().enumerate() {
        let key = if cell_degrees > 0.0 {
            (
                (facility.position.lat() / cell_degrees).floor() as i64,
                (facility.position.lon() / cell_degrees).floor() as i64,
            )
        } else {
            (i64::MIN, i64::try_from(i).unwrap_or(i64::MAX))
        };
        let acc = cells.entry(key).or_insert_with(|| {
            order.push(key);
            Acc {
                lat_sum: 0.0,
                lon_sum: 0.0,
                members: Vec::new(),
                critical: 0,
            }
        });
        acc.lat_sum += facility.position.lat();
        acc.lon_sum += facility.position.lon();
        acc.members.push(facility.id.clone());
        if facility.is_critical() {
            acc.critical += 1;
        }
    }

    order
        .into_iter()
        .filter_map(|key| cells.remove(&key))
        .filter_map(|acc| {
            #[allow(clippy::cast_precision_loss)]
            let n = acc.members.len() as f64;
            let center = Position::new(acc.lat_sum / n, acc.lon_sum / n).ok()?;
            Some(Cluster {
                center,
                members: acc.members,
                critical: acc.critical,
            })
        })
        .collect()
}

// ── Rail stations ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RailStation {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub description: &'static str,
    pub info_url: &'static str,
}

pub const RAIL_STATIONS: &[RailStation] = &[
    RailStation {
        name: "Berlin Hauptbahnhof",
        lat: 52.5251,
        lon: 13.3694,
        description: "Largest crossing station in Europe",
        info_url: "https://www.bahnhof.de/berlin-hbf",
    },
    RailStation {
        name: "München Hbf",
        lat: 48.1402,
        lon: 11.5586,
        description: "Main hub of southern Germany",
        info_url: "https://www.bahnhof.de/muenchen-hbf",
    },
    RailStation {
        name: "Frankfurt (Main) Hbf",
        lat: 50.1071,
        lon: 8.6638,
        description: "Busiest long-distance station in Germany",
        info_url: "https://www.bahnhof.de/frankfurt-main-hbf",
    },
    RailStation {
        name: "Hamburg Hbf",
        lat: 53.5526,
        lon: 10.0067,
        description: "Most frequented station in Germany",
        info_url: "https://www.bahnhof.de/hamburg-hbf",
    },
];

// ── Alerts ───────────────────────────────────────────────────────────

/// Whether the critical-alert banner should be raised.
pub fn has_critical(facilities: &[Arc<Facility>]) -> bool {
    facilities.iter().any(|f| f.is_critical())
}

pub fn critical_facilities(facilities: &[Arc<Facility>]) -> Vec<Arc<Facility>> {
    facilities
        .iter()
        .filter(|f| f.is_critical())
        .cloned()
        .collect()
}
