// ── Terminal session ──
//
// Per-terminal interaction state. Toggle flips and slider moves are staged
// against a baseline until applied or reverted. The session never touches
// telemetry directly; operations that affect signals return the
// `FeedCommand`s the caller forwards to the feed.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use super::{ButtonAction, LedColor, LedRule, TerminalSchema, TabSpec, Widget, schema_for};
use crate::error::CoreError;
use crate::model::{Facility, FacilityId};
use crate::telemetry::{FeedCommand, Readings, Telemetry};

/// Audit entries kept per session.
pub const AUDIT_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Staged {
    toggles: IndexMap<&'static str, bool>,
    setpoints: IndexMap<&'static str, f64>,
}

pub struct TerminalSession {
    schema: &'static TerminalSchema,
    facility: FacilityId,
    title: String,
    active_tab: usize,
    current: Staged,
    baseline: Staged,
    emergency: bool,
    audit: VecDeque<AuditEntry>,
}

impl TerminalSession {
    pub fn open(facility: &Facility) -> Self {
        let schema = schema_for(facility.kind);
        let toggles = schema.toggles().collect();
        let setpoints = schema
            .sliders()
            .filter_map(|w| match *w {
                Widget::Slider { signal, .. } => {
                    schema.signal(signal).map(|s| (signal, s.initial))
                }
                _ => None,
            })
            .collect();
        let staged = Staged {
            toggles,
            setpoints,
        };

        let mut session = Self {
            schema,
            facility: facility.id.clone(),
            title: format!("{} {}", schema.title, facility.name),
            active_tab: 0,
            baseline: staged.clone(),
            current: staged,
            emergency: false,
            audit: VecDeque::with_capacity(AUDIT_CAPACITY),
        };
        session.log("Terminal opened");
        session
    }

    /// Fresh telemetry for this terminal's signals.
    pub fn telemetry(&self) -> Telemetry {
        Telemetry::new(self.schema.signals)
    }

    pub fn schema(&self) -> &'static TerminalSchema {
        self.schema
    }

    pub fn facility(&self) -> &FacilityId {
        &self.facility
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    // ── Tabs ─────────────────────────────────────────────────────────

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn tab(&self) -> &'static TabSpec {
        let schema = self.schema;
        &schema.tabs[self.active_tab]
    }

    pub fn next_tab(&mut self) {
        self.active_tab = (self.active_tab + 1) % self.schema.tabs.len();
    }

    pub fn prev_tab(&mut self) {
        let n = self.schema.tabs.len();
        self.active_tab = (self.active_tab + n - 1) % n;
    }

    pub fn select_tab(&mut self, index: usize) -> bool {
        if index < self.schema.tabs.len() {
            self.active_tab = index;
            true
        } else {
            false
        }
    }

    // ── Toggles ──────────────────────────────────────────────────────

    pub fn toggle_state(&self, key: &str) -> Option<bool> {
        self.current.toggles.get(key).copied()
    }

    /// Flip a toggle. Refused during an emergency shutdown.
    pub fn toggle(&mut self, key: &str) -> Result<bool, CoreError> {
        if self.emergency {
            return Err(CoreError::ValidationFailed {
                message: "controls are locked after an emergency shutdown".into(),
            });
        }
        let state = self
            .current
            .toggles
            .get_mut(key)
            .ok_or_else(|| CoreError::ValidationFailed {
                message: format!("unknown toggle '{key}'"),
            })?;
        *state = !*state;
        Ok(*state)
    }

    /// Flip the `n`-th toggle (0-based) of the active tab.
    pub fn toggle_nth(&mut self, n: usize) -> Result<bool, CoreError> {
        let key = self
            .tab()
            .widgets
            .iter()
            .filter_map(|w| match *w {
                Widget::Toggle { key, .. } => Some(key),
                _ => None,
            })
            .nth(n)
            .ok_or_else(|| CoreError::ValidationFailed {
                message: format!("no toggle #{} on this tab", n + 1),
            })?;
        self.toggle(key)
    }

    // ── Sliders ──────────────────────────────────────────────────────

    pub fn setpoint(&self, signal: &str) -> Option<f64> {
        self.current.setpoints.get(signal).copied()
    }

    /// Move the first slider of the active tab by `delta`, clamped to its
    /// range. Returns the new setpoint, or `None` if the tab has no slider.
    pub fn nudge_slider(&mut self, delta: f64) -> Option<f64> {
        if self.emergency {
            return None;
        }
        let (signal, min, max) = self.tab().widgets.iter().find_map(|w| match *w {
            Widget::Slider {
                signal, min, max, ..
            } => Some((signal, min, max)),
            _ => None,
        })?;
        let value = self.current.setpoints.get_mut(signal)?;
        *value = (*value + delta).clamp(min, max);
        Some(*value)
    }

    // ── Staging ──────────────────────────────────────────────────────

    pub fn has_changes(&self) -> bool {
        self.current != self.baseline
    }

    /// Commit staged changes. Returns the telemetry updates for sliders
    /// that moved.
    pub fn apply(&mut self) -> Vec<FeedCommand> {
        if !self.has_changes() {
            return Vec::new();
        }
        let commands = self
            .current
            .setpoints
            .iter()
            .filter(|(k, v)| self.baseline.setpoints.get(*k) != Some(*v))
            .map(|(k, v)| FeedCommand::Set {
                key: (*k).to_owned(),
                value: *v,
            })
            .collect();

        let flipped: Vec<String> = self
            .current
            .toggles
            .iter()
            .filter(|(k, v)| self.baseline.toggles.get(*k) != Some(*v))
            .map(|(k, v)| format!("{k} {}", if *v { "on" } else { "off" }))
            .collect();

        self.baseline = self.current.clone();
        if flipped.is_empty() {
            self.log("Setpoints applied");
        } else {
            self.log(format!("Applied: {}", flipped.join(", ")));
        }
        commands
    }

    pub fn revert(&mut self) {
        if self.has_changes() {
            self.current = self.baseline.clone();
            self.log("Changes reverted");
        }
    }

    // ── Emergency ────────────────────────────────────────────────────

    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    /// Switch every toggle off, drive configured signals to their safe
    /// values and freeze telemetry. Runs once per session.
    pub fn emergency_shutdown(&mut self) -> Vec<FeedCommand> {
        if self.emergency {
            return Vec::new();
        }
        self.emergency = true;
        for state in self.current.toggles.values_mut() {
            *state = false;
        }
        let schema = self.schema;
        let mut commands: Vec<FeedCommand> = schema
            .emergency
            .iter()
            .map(|(key, value)| {
                if let Some(sp) = self.current.setpoints.get_mut(key) {
                    *sp = *value;
                }
                FeedCommand::Set {
                    key: (*key).to_owned(),
                    value: *value,
                }
            })
            .collect();
        commands.push(FeedCommand::Freeze(true));
        self.baseline = self.current.clone();

        warn!(facility = %self.facility, "emergency shutdown");
        self.log("EMERGENCY SHUTDOWN initiated");
        commands
    }

    /// Run a button's action.
    pub fn press(&mut self, action: ButtonAction) -> Vec<FeedCommand> {
        match action {
            ButtonAction::EmergencyShutdown => self.emergency_shutdown(),
            ButtonAction::Log(message) => {
                self.log(message);
                Vec::new()
            }
        }
    }

    pub fn led_color(&self, rule: &LedRule, readings: &Readings) -> LedColor {
        rule.color(readings, |key| self.toggle_state(key), self.emergency)
    }

    // ── Audit log ────────────────────────────────────────────────────

    /// Newest first.
    pub fn audit(&self) -> impl Iterator<Item = &AuditEntry> {
        self.audit.iter()
    }

    fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(facility = %self.facility, %message, "terminal");
        self.audit.push_front(AuditEntry {
            at: Utc::now(),
            message,
        });
        self.audit.truncate(AUDIT_CAPACITY);
    }
}
