// ── Wire-to-domain conversion ──
//
// Validates fixture records against the closed type/status sets and the
// coordinate ranges. Bad records are skipped and counted; they never fail
// the load as a whole.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use hivemap_api::{FacilityRecord, FixturePayload, HistoryRecord};

use crate::model::{Facility, FacilityId, FacilityStatus, FacilityType, HistoryEntry, Position};

/// Outcome counts of one conversion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: usize,
}

/// Why a single record was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingId,
    DuplicateId(String),
    UnknownType(String),
    UnknownStatus(String),
    InvalidPosition(String),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "missing id"),
            Self::DuplicateId(id) => write!(f, "duplicate id {id}"),
            Self::UnknownType(t) => write!(f, "unknown type {t:?}"),
            Self::UnknownStatus(s) => write!(f, "unknown status {s:?}"),
            Self::InvalidPosition(msg) => write!(f, "invalid position: {msg}"),
        }
    }
}

/// Convert one wire record into a `Facility`.
pub fn facility_from_record(record: FacilityRecord) -> Result<Facility, Rejection> {
    let id = record
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or(Rejection::MissingId)?;

    let kind_token = record.kind.unwrap_or_default();
    let kind = FacilityType::from_str(kind_token.trim())
        .map_err(|_| Rejection::UnknownType(kind_token.clone()))?;

    let status_token = record.status.unwrap_or_default();
    let status = FacilityStatus::from_str(status_token.trim())
        .map_err(|_| Rejection::UnknownStatus(status_token.clone()))?;

    let [lat, lon] = record
        .position
        .ok_or_else(|| Rejection::InvalidPosition("missing".into()))?;
    let position =
        Position::new(lat, lon).map_err(|e| Rejection::InvalidPosition(e.to_string()))?;

    let history = record
        .history
        .unwrap_or_default()
        .into_iter()
        .filter_map(history_entry)
        .collect();

    Ok(Facility {
        id: FacilityId::from(id),
        name: record.name.unwrap_or_default(),
        kind,
        status,
        country: record.country.unwrap_or_default(),
        position,
        description: record.description,
        history,
        info_url: record.info_url,
        source: record.raw,
    })
}

fn history_entry(record: HistoryRecord) -> Option<HistoryEntry> {
    let timestamp = record
        .timestamp
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())?
        .with_timezone(&Utc);
    let status = FacilityStatus::from_str(record.status.as_deref()?).ok()?;
    Some(HistoryEntry { timestamp, status })
}

/// Convert a whole payload, keeping fixture order and the first record for
/// each id.
pub fn facilities_from_payload(payload: FixturePayload) -> (Vec<Facility>, LoadReport) {
    let mut report = LoadReport {
        accepted: 0,
        rejected: payload.malformed.len(),
    };
    for bad in &payload.malformed {
        warn!(index = bad.index, reason = %bad.reason, "skipping malformed fixture entry");
    }

    let mut seen = HashSet::new();
    let mut facilities = Vec::with_capacity(payload.records.len());
    for record in payload.records {
        let converted = facility_from_record(record).and_then(|f| {
            if seen.insert(f.id.clone()) {
                Ok(f)
            } else {
                Err(Rejection::DuplicateId(f.id.to_string()))
            }
        });
        match converted {
            Ok(facility) => facilities.push(facility),
            Err(rejection) => {
                warn!(%rejection, "skipping facility record");
                report.rejected += 1;
            }
        }
    }
    report.accepted = facilities.len();
    (facilities, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, kind: &str, status: &str, position: [f64; 2]) -> FacilityRecord {
        FacilityRecord {
            id: Some(id.into()),
            name: Some(format!("Facility {id}")),
            kind: Some(kind.into()),
            status: Some(status.into()),
            country: Some("DE".into()),
            position: Some(position),
            ..FacilityRecord::default()
        }
    }

    #[test]
    fn converts_valid_record_with_defaults() {
        let facility = facility_from_record(FacilityRecord {
            name: None,
            country: None,
            ..record("water-1", "water", "offline", [47.0, 8.0])
        })
        .expect("valid");

        assert_eq!(facility.kind, FacilityType::Water);
        assert_eq!(facility.status, FacilityStatus::Offline);
        assert_eq!(facility.name, "");
        assert_eq!(facility.country, "");
        assert!(facility.history.is_empty());
    }

    #[test]
    fn rejects_unknown_enums_and_bad_positions() {
        assert_eq!(
            facility_from_record(record("a", "spaceport", "active", [0.0, 0.0])),
            Err(Rejection::UnknownType("spaceport".into()))
        );
        assert_eq!(
            facility_from_record(record("a", "port", "burning", [0.0, 0.0])),
            Err(Rejection::UnknownStatus("burning".into()))
        );
        assert!(matches!(
            facility_from_record(record("a", "port", "active", [95.0, 0.0])),
            Err(Rejection::InvalidPosition(_))
        ));
        assert_eq!(
            facility_from_record(FacilityRecord {
                id: Some("  ".into()),
                ..record("a", "port", "active", [0.0, 0.0])
            }),
            Err(Rejection::MissingId)
        );
    }

    #[test]
    fn drops_unreadable_history_entries() {
        let facility = facility_from_record(FacilityRecord {
            history: Some(vec![
                HistoryRecord {
                    timestamp: Some("2025-03-01T12:00:00Z".into()),
                    status: Some("critical".into()),
                },
                HistoryRecord {
                    timestamp: Some("yesterday".into()),
                    status: Some("active".into()),
                },
                HistoryRecord {
                    timestamp: Some("2025-03-02T12:00:00+01:00".into()),
                    status: None,
                },
            ]),
            ..record("fire-1", "fire", "active", [50.0, 8.0])
        })
        .expect("valid");

        assert_eq!(facility.history.len(), 1);
        assert_eq!(facility.history[0].status, FacilityStatus::Critical);
    }

    #[test]
    fn payload_conversion_keeps_first_duplicate_and_counts_rejects() {
        let payload = FixturePayload {
            records: vec![
                record("power-1", "power", "active", [52.0, 13.0]),
                record("power-1", "power", "critical", [52.0, 13.0]),
                record("bad", "unknown", "active", [52.0, 13.0]),
                record("base-1", "base", "active", [49.0, 7.0]),
            ],
            malformed: vec![hivemap_api::MalformedRecord {
                index: 4,
                reason: "not an object".into(),
            }],
        };

        let (facilities, report) = facilities_from_payload(payload);

        let ids: Vec<_> = facilities.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["power-1", "base-1"]);
        assert_eq!(facilities[0].status, FacilityStatus::Active);
        assert_eq!(
            report,
            LoadReport {
                accepted: 2,
                rejected: 3
            }
        );
    }
}
