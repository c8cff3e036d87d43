// ── Telemetry simulation ──
//
// Fabricated readings for terminal views. Each terminal owns one
// `Telemetry`; nothing here is shared between terminals.

mod feed;

pub use feed::{FeedCommand, TelemetryFeed};

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::error::CoreError;

/// How a signal moves on each step. `r` is uniform in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drift {
    /// `value += (r - 0.5) * volatility`, clamped to the signal range.
    Walk { volatility: f64 },
    /// `value = base + r * spread`.
    Jitter { base: f64, spread: f64 },
    /// Only changes through [`Telemetry::set`].
    Steady,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSpec {
    pub key: &'static str,
    pub initial: f64,
    pub min: f64,
    pub max: f64,
    pub drift: Drift,
}

impl SignalSpec {
    pub const fn walk(key: &'static str, initial: f64, min: f64, max: f64, volatility: f64) -> Self {
        Self {
            key,
            initial,
            min,
            max,
            drift: Drift::Walk { volatility },
        }
    }

    /// Jitter signals range over `[base, base + spread]`.
    pub const fn jitter(key: &'static str, base: f64, spread: f64) -> Self {
        Self {
            key,
            initial: base,
            min: base,
            max: base + spread,
            drift: Drift::Jitter { base, spread },
        }
    }

    pub const fn steady(key: &'static str, initial: f64, min: f64, max: f64) -> Self {
        Self {
            key,
            initial,
            min,
            max,
            drift: Drift::Steady,
        }
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Current value of every signal, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Readings(IndexMap<&'static str, f64>);

impl Readings {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The signals of one terminal plus the RNG that moves them.
#[derive(Debug, Clone)]
pub struct Telemetry {
    specs: Vec<SignalSpec>,
    readings: Readings,
    rng: StdRng,
    frozen: bool,
}

impl Telemetry {
    pub fn new(specs: &[SignalSpec]) -> Self {
        Self::with_rng(specs, StdRng::from_os_rng())
    }

    /// Deterministic telemetry for tests and `--seed`.
    pub fn seeded(specs: &[SignalSpec], seed: u64) -> Self {
        Self::with_rng(specs, StdRng::seed_from_u64(seed))
    }

    fn with_rng(specs: &[SignalSpec], rng: StdRng) -> Self {
        let readings = Readings(
            specs
                .iter()
                .map(|s| (s.key, s.clamp(s.initial)))
                .collect(),
        );
        Self {
            specs: specs.to_vec(),
            readings,
            rng,
            frozen: false,
        }
    }

    /// Advance every signal once. No-op while frozen.
    pub fn step(&mut self) {
        if self.frozen {
            return;
        }
        for spec in &self.specs {
            let Some(value) = self.readings.0.get_mut(spec.key) else {
                continue;
            };
            let r: f64 = self.rng.random();
            let next = match spec.drift {
                Drift::Walk { volatility } => *value + (r - 0.5) * volatility,
                Drift::Jitter { base, spread } => base + r * spread,
                Drift::Steady => *value,
            };
            *value = spec.clamp(next);
        }
    }

    pub fn readings(&self) -> &Readings {
        &self.readings
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.readings.get(key)
    }

    /// Force a signal to `value`, clamped to its range. Works while frozen.
    pub fn set(&mut self, key: &str, value: f64) -> Result<f64, CoreError> {
        let spec = self
            .specs
            .iter()
            .find(|s| s.key == key)
            .ok_or_else(|| CoreError::ValidationFailed {
                message: format!("unknown signal '{key}'"),
            })?;
        let clamped = spec.clamp(value);
        if let Some(slot) = self.readings.0.get_mut(key) {
            *slot = clamped;
        }
        Ok(clamped)
    }

    pub fn freeze(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Execute a feed command in place. Unknown signals are ignored.
    pub fn apply(&mut self, command: &FeedCommand) {
        match command {
            FeedCommand::Freeze(frozen) => self.freeze(*frozen),
            FeedCommand::Set { key, value } => {
                if let Err(e) = self.set(key, *value) {
                    debug!(error = %e, "telemetry set ignored");
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SPECS: &[SignalSpec] = &[
        SignalSpec::walk("load", 50.0, 0.0, 100.0, 40.0),
        SignalSpec::jitter("freq", 49.9, 0.2),
        SignalSpec::steady("rods", 65.0, 0.0, 100.0),
    ];

    #[test]
    fn starts_at_initial_values_in_order() {
        let t = Telemetry::seeded(SPECS, 1);
        let keys: Vec<_> = t.readings().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["load", "freq", "rods"]);
        assert_eq!(t.get("load"), Some(50.0));
    }

    #[test]
    fn walks_stay_within_bounds() {
        let mut t = Telemetry::seeded(SPECS, 7);
        for _ in 0..1_000 {
            t.step();
            let load = t.get("load").unwrap();
            assert!((0.0..=100.0).contains(&load), "load escaped: {load}");
            let freq = t.get("freq").unwrap();
            assert!((49.9..=50.1).contains(&freq), "freq escaped: {freq}");
        }
        assert_eq!(t.get("rods"), Some(65.0));
    }

    #[test]
    fn frozen_telemetry_does_not_move() {
        let mut t = Telemetry::seeded(SPECS, 3);
        t.freeze(true);
        let before = t.readings().clone();
        for _ in 0..50 {
            t.step();
        }
        assert_eq!(t.readings(), &before);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Telemetry::seeded(SPECS, 42);
        let mut b = Telemetry::seeded(SPECS, 42);
        for _ in 0..10 {
            a.step();
            b.step();
        }
        assert_eq!(a.readings(), b.readings());
    }

    #[test]
    fn set_clamps_and_rejects_unknown_keys() {
        let mut t = Telemetry::seeded(SPECS, 0);
        assert_eq!(t.set("rods", 140.0).unwrap(), 100.0);
        assert_eq!(t.get("rods"), Some(100.0));
        assert!(matches!(
            t.set("nope", 1.0),
            Err(CoreError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn applies_feed_commands() {
        let mut t = Telemetry::seeded(SPECS, 5);
        t.apply(&FeedCommand::Set {
            key: "load".into(),
            value: 12.5,
        });
        t.apply(&FeedCommand::Set {
            key: "missing".into(),
            value: 1.0,
        });
        t.apply(&FeedCommand::Freeze(true));

        assert_eq!(t.get("load"), Some(12.5));
        assert!(t.is_frozen());
    }
}
