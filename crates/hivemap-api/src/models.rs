// Fixture wire types
//
// The fixture is a bare JSON array of facility objects. Every field is
// optional on the wire; validation against the closed type/status sets
// happens in hivemap-core when records are converted into domain models.

use serde::{Deserialize, Serialize};

// ── Facility ─────────────────────────────────────────────────────────

/// One facility object as it appears in the fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacilityRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// `[latitude, longitude]`
    #[serde(default)]
    pub position: Option<[f64; 2]>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<HistoryRecord>>,
    #[serde(default, rename = "infoUrl")]
    pub info_url: Option<String>,
    /// Catch-all for fields the dashboard does not use.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    /// The object exactly as it appeared in the fixture, key order included.
    #[serde(skip)]
    pub raw: serde_json::Map<String, serde_json::Value>,
}

/// A `{timestamp, status}` entry in a facility's history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// ── Payload ──────────────────────────────────────────────────────────

/// An array element that could not be read as a facility object at all
/// (e.g. a bare string, or a position that is not a number pair).
#[derive(Debug, Clone)]
pub struct MalformedRecord {
    pub index: usize,
    pub reason: String,
}

/// Everything one fetch produced, in fixture order.
#[derive(Debug, Clone, Default)]
pub struct FixturePayload {
    pub records: Vec<FacilityRecord>,
    pub malformed: Vec<MalformedRecord>,
}

impl FixturePayload {
    /// Split a parsed JSON array into readable records and malformed ones.
    pub fn from_values(values: Vec<serde_json::Value>) -> Self {
        let mut payload = Self::default();
        for (index, value) in values.into_iter().enumerate() {
            let raw = value.as_object().cloned().unwrap_or_default();
            match serde_json::from_value::<FacilityRecord>(value) {
                Ok(record) => payload.records.push(FacilityRecord { raw, ..record }),
                Err(e) => payload.malformed.push(MalformedRecord {
                    index,
                    reason: e.to_string(),
                }),
            }
        }
        payload
    }
}
