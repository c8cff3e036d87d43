// hivemap-api: Async client for the facility fixture (remote JSON or local file)

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{FixtureClient, FixtureSource};
pub use error::Error;
pub use models::{FacilityRecord, FixturePayload, HistoryRecord, MalformedRecord};
pub use transport::TransportConfig;
