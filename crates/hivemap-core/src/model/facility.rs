// ── Facility domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::facility_id::FacilityId;
use super::position::Position;

/// Facility category. Closed set; the wire token is the lower-case name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FacilityType {
    Power,
    Airport,
    Server,
    Gov,
    Water,
    Base,
    Hospital,
    Fire,
    Police,
    School,
    CityHall,
    Bridge,
    Port,
    Energy,
    Metro,
    University,
    Control,
}

/// Operational status of a facility.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FacilityStatus {
    Active,
    Critical,
    Offline,
}

impl FacilityStatus {
    pub fn is_critical(self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// One past status observation. History is read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub status: FacilityStatus,
}

/// A fixture object as loaded, before any typing.
pub type SourceRecord = serde_json::Map<String, serde_json::Value>;

/// A simulated infrastructure site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FacilityType,
    pub status: FacilityStatus,
    pub country: String,
    pub position: Position,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub info_url: Option<String>,
    /// The fixture object this facility was read from. CSV export writes
    /// these verbatim. Empty for facilities built in code.
    #[serde(skip)]
    pub source: SourceRecord,
}

impl Facility {
    pub fn is_critical(&self) -> bool {
        self.status.is_critical()
    }

    /// The most recent history entry, if any.
    pub fn last_change(&self) -> Option<&HistoryEntry> {
        self.history.iter().max_by_key(|h| h.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn type_tokens_round_trip_through_strum_and_serde() {
        assert_eq!(FacilityType::iter().count(), 17);
        for kind in FacilityType::iter() {
            let token: &'static str = kind.into();
            assert_eq!(FacilityType::from_str(token).ok(), Some(kind));
            assert_eq!(
                serde_json::to_value(kind).expect("json"),
                serde_json::Value::from(token)
            );
        }
        assert_eq!(FacilityType::CityHall.to_string(), "cityhall");
        assert_eq!(FacilityType::from_str("Power").ok(), Some(FacilityType::Power));
    }

    #[test]
    fn facility_deserializes_from_fixture_shape() {
        let facility: Facility = serde_json::from_str(
            r#"{
                "id": "hospital-1",
                "name": "Charité",
                "type": "hospital",
                "status": "critical",
                "country": "DE",
                "position": [52.526, 13.377]
            }"#,
        )
        .expect("facility");

        assert_eq!(facility.kind, FacilityType::Hospital);
        assert!(facility.is_critical());
        assert!(facility.description.is_none());
        assert!(facility.history.is_empty());
        assert!(facility.last_change().is_none());
    }
}
