// ── Telemetry feed task ──
//
// One background task per open terminal: steps its `Telemetry` on an
// interval and publishes readings through a watch channel. Dropping the
// feed cancels the task.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{Readings, Telemetry};
use crate::error::CoreError;
use crate::stream::StateStream;

const COMMAND_CHANNEL_SIZE: usize = 16;

/// Commands accepted by a running feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedCommand {
    Freeze(bool),
    Set { key: String, value: f64 },
}

pub struct TelemetryFeed {
    readings: watch::Receiver<Readings>,
    commands: mpsc::Sender<FeedCommand>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TelemetryFeed {
    /// Start stepping `telemetry` every `period`. Must be called inside a
    /// tokio runtime.
    pub fn spawn(telemetry: Telemetry, period: Duration) -> Self {
        let (readings_tx, readings) = watch::channel(telemetry.readings().clone());
        let (commands, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(feed_task(
            telemetry,
            period,
            readings_tx,
            command_rx,
            cancel.clone(),
        ));

        Self {
            readings,
            commands,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn readings(&self) -> Readings {
        self.readings.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<Readings> {
        StateStream::new(self.readings.clone())
    }

    pub async fn send(&self, command: FeedCommand) -> Result<(), CoreError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CoreError::Internal("telemetry feed has stopped".into()))
    }

    /// Cancel the task and wait for it to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TelemetryFeed {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn feed_task(
    mut telemetry: Telemetry,
    period: Duration,
    readings: watch::Sender<Readings>,
    mut commands: mpsc::Receiver<FeedCommand>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            Some(command) = commands.recv() => {
                telemetry.apply(&command);
                readings.send_replace(telemetry.readings().clone());
            }
            _ = interval.tick() => {
                if !telemetry.is_frozen() {
                    telemetry.step();
                    readings.send_replace(telemetry.readings().clone());
                }
            }
        }
    }

    debug!("telemetry feed stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::telemetry::SignalSpec;

    const SPECS: &[SignalSpec] = &[
        SignalSpec::walk("load", 50.0, 0.0, 100.0, 20.0),
        SignalSpec::steady("rods", 65.0, 0.0, 100.0),
    ];

    #[tokio::test(start_paused = true)]
    async fn publishes_a_step_per_tick() {
        let feed = TelemetryFeed::spawn(Telemetry::seeded(SPECS, 9), Duration::from_secs(2));
        let mut sub = feed.subscribe();

        let next = sub.changed().await.unwrap();

        assert_eq!(next.len(), 2);
        assert_eq!(next.get("rods"), Some(65.0));
        feed.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn commands_apply_immediately() {
        let feed = TelemetryFeed::spawn(Telemetry::seeded(SPECS, 9), Duration::from_secs(60));
        let mut sub = feed.subscribe();

        feed.send(FeedCommand::Freeze(true)).await.unwrap();
        sub.changed().await.unwrap();
        feed.send(FeedCommand::Set {
            key: "rods".into(),
            value: 10.0,
        })
        .await
        .unwrap();
        let after = sub.changed().await.unwrap();
        assert_eq!(after.get("rods"), Some(10.0));

        tokio::time::advance(Duration::from_secs(600)).await;
        assert_eq!(feed.readings(), after);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_feed_stops_the_task() {
        let feed = TelemetryFeed::spawn(Telemetry::seeded(SPECS, 1), Duration::from_secs(1));
        let mut sub = feed.subscribe();
        drop(feed);

        assert!(sub.changed().await.is_none());
    }
}
