// ── One-shot startup load ──

use tracing::{info, warn};

use hivemap_api::FixtureClient;

use super::FacilityStore;
use crate::convert::{LoadReport, facilities_from_payload};
use crate::error::CoreError;
use crate::locale::Locale;

/// Fetch the fixture once and move `store` out of `Loading`.
///
/// On failure the store keeps an empty collection and the fixed localized
/// message; the detailed cause is logged and returned. Never retries.
pub async fn load_into(
    store: &FacilityStore,
    client: &FixtureClient,
    locale: Locale,
) -> Result<LoadReport, CoreError> {
    if !store.is_loading() {
        return Err(CoreError::Internal("facility store already loaded".into()));
    }

    info!(source = %client.source(), "loading facilities");
    match client.fetch().await {
        Ok(payload) => {
            let (facilities, report) = facilities_from_payload(payload);
            store.populate(facilities, report);
            info!(
                accepted = report.accepted,
                rejected = report.rejected,
                "facilities loaded"
            );
            Ok(report)
        }
        Err(e) => {
            warn!(error = %e, source = %client.source(), "facility load failed");
            store.fail(locale.load_error());
            Err(e.into())
        }
    }
}
