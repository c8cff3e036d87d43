// ── Facility store ──
//
// One-shot, in-memory facility collection with reactive subscriptions.

mod facility_store;
mod loader;

pub use facility_store::{FacilityStore, LoadState, Snapshot};
pub use loader::load_into;
