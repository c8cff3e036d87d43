// ── Domain model ──
//
// Canonical facility types shared by the store, the filter engine, the
// overlays and both front ends. Wire records from hivemap-api are converted
// into these in `crate::convert`.

pub mod facility;
pub mod facility_id;
pub mod position;

// ── Re-exports ──────────────────────────────────────────────────────

pub use facility::{Facility, FacilityStatus, FacilityType, HistoryEntry, SourceRecord};
pub use facility_id::FacilityId;
pub use position::Position;
