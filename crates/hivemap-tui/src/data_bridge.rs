//! Data bridge: connects [`Dashboard`] state and telemetry feeds to TUI
//! actions.
//!
//! [`spawn_data_bridge`] runs the one-shot load and then forwards every UI
//! state change. [`spawn_feed_bridge`] owns the telemetry feed of one open
//! terminal: it relays readings to the app loop and commands to the feed.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use hivemap_core::{Dashboard, FacilityId, FeedCommand, TelemetryFeed};

use crate::action::{Action, Notification};

/// Load the fixture, publish the result, then forward UI state changes
/// until cancelled.
pub async fn spawn_data_bridge(
    dashboard: Dashboard,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut ui = dashboard.ui().subscribe();
    let _ = action_tx.send(Action::UiStateChanged(Box::new(ui.current().clone())));

    let result = tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        result = dashboard.load() => result,
    };

    match result {
        Ok(report) => {
            let _ = action_tx.send(Action::FacilitiesLoaded {
                facilities: dashboard.facilities(),
                report,
            });
            if report.rejected > 0 {
                let _ = action_tx.send(Action::Notify(Notification::warning(format!(
                    "Skipped {} malformed record(s)",
                    report.rejected
                ))));
            }
        }
        Err(e) => {
            warn!(error = %e, "startup load failed");
            let message = dashboard
                .store()
                .state()
                .error_message()
                .unwrap_or(dashboard.locale().load_error())
                .to_owned();
            let _ = action_tx.send(Action::LoadFailed(message));
        }
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(state) = ui.changed() => {
                let _ = action_tx.send(Action::UiStateChanged(Box::new(state)));
            }
        }
    }

    debug!("data bridge shut down");
}

/// Relay readings of `feed` as actions and forward staged commands to it.
/// The feed is shut down when `cancel` fires.
pub async fn spawn_feed_bridge(
    facility: FacilityId,
    feed: TelemetryFeed,
    mut commands: mpsc::UnboundedReceiver<FeedCommand>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut readings = feed.subscribe();
    let _ = action_tx.send(Action::ReadingsUpdated {
        facility: facility.clone(),
        readings: readings.current().clone(),
    });

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(command) = commands.recv() => {
                debug!(%facility, ?command, "feed command");
                if let Err(e) = feed.send(command).await {
                    warn!(%facility, error = %e, "telemetry feed rejected command");
                    break;
                }
            }

            Some(update) = readings.changed() => {
                let _ = action_tx.send(Action::ReadingsUpdated {
                    facility: facility.clone(),
                    readings: update,
                });
            }
        }
    }

    feed.shutdown().await;
    debug!(%facility, "feed bridge shut down");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use hivemap_core::{DashboardConfig, FixtureSource};

    use super::*;

    fn fixture(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    fn dashboard_for(path: std::path::PathBuf) -> Dashboard {
        Dashboard::new(DashboardConfig {
            source: FixtureSource::Local(path),
            ..DashboardConfig::default()
        })
    }

    #[tokio::test]
    async fn publishes_load_and_ui_changes() {
        let file = fixture(
            r#"[{"id":"power-1","name":"Nord","type":"power","status":"critical","country":"DE","position":[53.5,10.0]}]"#,
        );
        let dashboard = dashboard_for(file.path().to_path_buf());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(spawn_data_bridge(dashboard.clone(), tx, cancel.clone()));

        assert!(matches!(rx.recv().await, Some(Action::UiStateChanged(_))));
        match rx.recv().await {
            Some(Action::FacilitiesLoaded { facilities, report }) => {
                assert_eq!(facilities.len(), 1);
                assert_eq!(report.accepted, 1);
            }
            other => panic!("expected FacilitiesLoaded, got {other:?}"),
        }

        dashboard.ui().set_show_heatmap(true);
        match tokio::time::timeout(Duration::from_secs(2), rx.recv()).await {
            Ok(Some(Action::UiStateChanged(state))) => assert!(state.show_heatmap),
            other => panic!("expected UiStateChanged, got {other:?}"),
        }

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn reports_localized_load_failure() {
        let dashboard = dashboard_for("/definitely/not/here.json".into());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(spawn_data_bridge(dashboard, tx, cancel.clone()));

        assert!(matches!(rx.recv().await, Some(Action::UiStateChanged(_))));
        match rx.recv().await {
            Some(Action::LoadFailed(message)) => assert_eq!(message, "Failed to load facilities"),
            other => panic!("expected LoadFailed, got {other:?}"),
        }

        cancel.cancel();
        task.await.unwrap();
    }
}
