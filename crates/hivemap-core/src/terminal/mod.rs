// ── Terminal schemas ──
//
// A terminal is a fabricated control panel opened from a facility. Its
// layout is declarative: every facility type has one static schema listing
// the simulated signals and the widgets grouped by tab. Widgets refer to
// signals and toggles by key.

mod schemas;
mod session;

pub use schemas::{ALL_SCHEMAS, schema_for};
pub use session::{AUDIT_CAPACITY, AuditEntry, TerminalSession};

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::FacilityType;
use crate::telemetry::{Readings, SignalSpec};

// ── Schema types ─────────────────────────────────────────────────────

#[derive(Debug)]
pub struct TerminalSchema {
    pub kind: FacilityType,
    /// Prefix shown before the facility name.
    pub title: &'static str,
    pub tick: Duration,
    pub signals: &'static [SignalSpec],
    pub tabs: &'static [TabSpec],
    /// Values forced onto signals by an emergency shutdown.
    pub emergency: &'static [(&'static str, f64)],
}

#[derive(Debug)]
pub struct TabSpec {
    pub title: &'static str,
    pub widgets: &'static [Widget],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Widget {
    Gauge {
        label: &'static str,
        signal: &'static str,
        unit: &'static str,
        min: f64,
        max: f64,
        zones: &'static [Zone],
    },
    Display {
        label: &'static str,
        signal: &'static str,
        unit: &'static str,
        decimals: usize,
        alarm_above: Option<f64>,
    },
    Toggle {
        key: &'static str,
        label: &'static str,
        default: bool,
    },
    Led {
        label: &'static str,
        rule: LedRule,
    },
    Slider {
        signal: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        unit: &'static str,
    },
    Button {
        label: &'static str,
        action: ButtonAction,
        confirm: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Normal,
    Warning,
    Danger,
}

/// Upper bound of a gauge color band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub max: f64,
    pub level: Level,
}

impl Zone {
    pub const fn new(max: f64, level: Level) -> Self {
        Self { max, level }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    Green,
    Yellow,
    Red,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LedRule {
    Fixed(LedColor),
    /// `hit` when the signal is strictly above `threshold`.
    Above {
        signal: &'static str,
        threshold: f64,
        hit: LedColor,
        otherwise: LedColor,
    },
    /// `hit` when the signal is strictly below `threshold`.
    Below {
        signal: &'static str,
        threshold: f64,
        hit: LedColor,
        otherwise: LedColor,
    },
    /// `hit` when `low <= signal <= high`.
    Between {
        signal: &'static str,
        low: f64,
        high: f64,
        hit: LedColor,
        otherwise: LedColor,
    },
    Toggle {
        key: &'static str,
        on: LedColor,
        off: LedColor,
    },
    /// Red during an emergency shutdown, green otherwise.
    Emergency,
}

impl LedRule {
    /// Color for the given readings. A missing signal or toggle reads `Off`.
    pub fn color(
        &self,
        readings: &Readings,
        toggle: impl Fn(&str) -> Option<bool>,
        emergency: bool,
    ) -> LedColor {
        let pick = |cond: bool, hit: LedColor, otherwise: LedColor| {
            if cond { hit } else { otherwise }
        };
        match *self {
            Self::Fixed(color) => color,
            Self::Above {
                signal,
                threshold,
                hit,
                otherwise,
            } => readings
                .get(signal)
                .map_or(LedColor::Off, |v| pick(v > threshold, hit, otherwise)),
            Self::Below {
                signal,
                threshold,
                hit,
                otherwise,
            } => readings
                .get(signal)
                .map_or(LedColor::Off, |v| pick(v < threshold, hit, otherwise)),
            Self::Between {
                signal,
                low,
                high,
                hit,
                otherwise,
            } => readings.get(signal).map_or(LedColor::Off, |v| {
                pick((low..=high).contains(&v), hit, otherwise)
            }),
            Self::Toggle { key, on, off } => toggle(key).map_or(LedColor::Off, |s| pick(s, on, off)),
            Self::Emergency => pick(emergency, LedColor::Red, LedColor::Green),
        }
    }

    fn signal(&self) -> Option<&'static str> {
        match *self {
            Self::Above { signal, .. } | Self::Below { signal, .. } | Self::Between { signal, .. } => {
                Some(signal)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    EmergencyShutdown,
    /// Record the message in the audit log.
    Log(&'static str),
}

// ── Schema behavior ──────────────────────────────────────────────────

/// Color band for `value`: the first zone whose `max` is at least `value`,
/// or the last zone when the value exceeds them all.
pub fn gauge_level(zones: &[Zone], value: f64) -> Level {
    zones
        .iter()
        .find(|z| value <= z.max)
        .or_else(|| zones.last())
        .map_or(Level::Normal, |z| z.level)
}

/// Fill ratio of a gauge in `[0, 1]`.
pub fn gauge_ratio(min: f64, max: f64, value: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

impl TerminalSchema {
    pub fn signal(&self, key: &str) -> Option<&SignalSpec> {
        self.signals.iter().find(|s| s.key == key)
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.tabs.iter().flat_map(|t| t.widgets.iter())
    }

    /// Every toggle declared on any tab, with its default state.
    pub fn toggles(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.widgets().filter_map(|w| match *w {
            Widget::Toggle { key, default, .. } => Some((key, default)),
            _ => None,
        })
    }

    pub fn sliders(&self) -> impl Iterator<Item = &Widget> {
        self.widgets()
            .filter(|w| matches!(w, Widget::Slider { .. }))
    }

    /// Check that every widget binds a declared signal or toggle and that
    /// toggle keys are unique.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fail = |message: String| {
            Err(CoreError::ValidationFailed {
                message: format!("{} terminal: {message}", self.kind),
            })
        };

        if self.tabs.is_empty() {
            return fail("no tabs".into());
        }

        let mut toggle_keys = HashSet::new();
        for (key, _) in self.toggles() {
            if !toggle_keys.insert(key) {
                return fail(format!("duplicate toggle '{key}'"));
            }
        }

        for widget in self.widgets() {
            let signal = match widget {
                Widget::Gauge { signal, .. }
                | Widget::Display { signal, .. }
                | Widget::Slider { signal, .. } => Some(*signal),
                Widget::Led { rule, .. } => {
                    if let LedRule::Toggle { key, .. } = rule {
                        if !toggle_keys.contains(key) {
                            return fail(format!("LED bound to unknown toggle '{key}'"));
                        }
                    }
                    rule.signal()
                }
                Widget::Toggle { .. } | Widget::Button { .. } => None,
            };
            if let Some(signal) = signal {
                if self.signal(signal).is_none() {
                    return fail(format!("widget bound to unknown signal '{signal}'"));
                }
            }
        }

        for (signal, _) in self.emergency {
            if self.signal(signal).is_none() {
                return fail(format!("emergency override for unknown signal '{signal}'"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::telemetry::Telemetry;

    const ZONES: &[Zone] = &[
        Zone::new(500.0, Level::Normal),
        Zone::new(800.0, Level::Warning),
        Zone::new(3000.0, Level::Danger),
    ];

    #[test]
    fn gauge_level_uses_first_matching_zone() {
        assert_eq!(gauge_level(ZONES, 320.0), Level::Normal);
        assert_eq!(gauge_level(ZONES, 500.0), Level::Normal);
        assert_eq!(gauge_level(ZONES, 650.0), Level::Warning);
        assert_eq!(gauge_level(ZONES, 9000.0), Level::Danger);
        assert_eq!(gauge_level(&[], 1.0), Level::Normal);
    }

    #[test]
    fn gauge_ratio_is_clamped() {
        assert!((gauge_ratio(0.0, 200.0, 50.0) - 0.25).abs() < f64::EPSILON);
        assert!((gauge_ratio(0.0, 200.0, 500.0) - 1.0).abs() < f64::EPSILON);
        assert!(gauge_ratio(5.0, 5.0, 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn led_rules() {
        let t = Telemetry::seeded(&[SignalSpec::steady("p", 150.0, 0.0, 300.0)], 0);
        let readings = t.readings();
        let no_toggles = |_: &str| None;

        let between = LedRule::Between {
            signal: "p",
            low: 100.0,
            high: 185.0,
            hit: LedColor::Green,
            otherwise: LedColor::Red,
        };
        assert_eq!(between.color(readings, no_toggles, false), LedColor::Green);

        let above = LedRule::Above {
            signal: "p",
            threshold: 200.0,
            hit: LedColor::Red,
            otherwise: LedColor::Green,
        };
        assert_eq!(above.color(readings, no_toggles, false), LedColor::Green);

        let missing = LedRule::Below {
            signal: "zz",
            threshold: 1.0,
            hit: LedColor::Red,
            otherwise: LedColor::Green,
        };
        assert_eq!(missing.color(readings, no_toggles, false), LedColor::Off);

        let breaker = LedRule::Toggle {
            key: "main",
            on: LedColor::Green,
            off: LedColor::Red,
        };
        assert_eq!(breaker.color(readings, |_| Some(false), false), LedColor::Red);
        assert_eq!(LedRule::Emergency.color(readings, no_toggles, true), LedColor::Red);
    }
}
