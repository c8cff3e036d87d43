//! Terminal snapshot: opens a facility's control terminal, runs the
//! simulation for `--ticks` steps and prints every tab.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use serde::Serialize;

use hivemap_core::terminal::{AuditEntry, LedColor, Level, Widget, gauge_level, gauge_ratio};
use hivemap_core::{Dashboard, FacilityId, Readings, Telemetry, TerminalSession};

use crate::cli::{GlobalOpts, TerminalArgs};
use crate::error::CliError;
use crate::output;

const BAR_WIDTH: usize = 20;

// ── Snapshot model ──────────────────────────────────────────────────

#[derive(Serialize)]
struct TerminalSnapshot<'a> {
    facility: &'a FacilityId,
    title: &'a str,
    ticks: u32,
    emergency: bool,
    readings: &'a Readings,
    tabs: Vec<TabSnapshot>,
    audit: Vec<&'a AuditEntry>,
}

#[derive(Serialize)]
struct TabSnapshot {
    title: &'static str,
    widgets: Vec<WidgetSnapshot>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum WidgetSnapshot {
    Gauge {
        label: &'static str,
        value: Option<f64>,
        unit: &'static str,
        ratio: f64,
        level: Level,
    },
    Display {
        label: &'static str,
        value: Option<f64>,
        text: String,
        alarm: bool,
    },
    Toggle {
        label: &'static str,
        key: &'static str,
        on: bool,
    },
    Led {
        label: &'static str,
        color: LedColor,
    },
    Slider {
        label: &'static str,
        setpoint: Option<f64>,
        min: f64,
        max: f64,
        unit: &'static str,
    },
    Button {
        label: &'static str,
        confirm: bool,
    },
}

fn widget_snapshot(session: &TerminalSession, readings: &Readings, w: &Widget) -> WidgetSnapshot {
    match *w {
        Widget::Gauge {
            label,
            signal,
            unit,
            min,
            max,
            zones,
        } => {
            let value = readings.get(signal);
            WidgetSnapshot::Gauge {
                label,
                value,
                unit,
                ratio: value.map_or(0.0, |v| gauge_ratio(min, max, v)),
                level: value.map_or(Level::Normal, |v| gauge_level(zones, v)),
            }
        }
        Widget::Display {
            label,
            signal,
            unit,
            decimals,
            alarm_above,
        } => {
            let value = readings.get(signal);
            WidgetSnapshot::Display {
                label,
                value,
                text: value.map_or_else(|| "--".into(), |v| format!("{v:.decimals$} {unit}")),
                alarm: matches!((value, alarm_above), (Some(v), Some(limit)) if v > limit),
            }
        }
        Widget::Toggle { key, label, .. } => WidgetSnapshot::Toggle {
            label,
            key,
            on: session.toggle_state(key).unwrap_or(false),
        },
        Widget::Led { label, rule } => WidgetSnapshot::Led {
            label,
            color: session.led_color(&rule, readings),
        },
        Widget::Slider {
            signal,
            label,
            min,
            max,
            unit,
        } => WidgetSnapshot::Slider {
            label,
            setpoint: session.setpoint(signal),
            min,
            max,
            unit,
        },
        Widget::Button { label, confirm, .. } => WidgetSnapshot::Button { label, confirm },
    }
}

// ── Table rendering ─────────────────────────────────────────────────

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn bar(ratio: f64) -> String {
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn paint_level(text: &str, level: Level, color: bool) -> String {
    if !color {
        return text.to_owned();
    }
    match level {
        Level::Normal => text.green().to_string(),
        Level::Warning => text.yellow().to_string(),
        Level::Danger => text.red().to_string(),
    }
}

fn led_glyph(c: LedColor, color: bool) -> String {
    let glyph = if c == LedColor::Off { "○" } else { "●" };
    if !color {
        let name = match c {
            LedColor::Green => "green",
            LedColor::Yellow => "yellow",
            LedColor::Red => "red",
            LedColor::Off => "off",
        };
        return format!("{glyph} {name}");
    }
    match c {
        LedColor::Green => glyph.green().to_string(),
        LedColor::Yellow => glyph.yellow().to_string(),
        LedColor::Red => glyph.red().to_string(),
        LedColor::Off => glyph.dimmed().to_string(),
    }
}

fn detail(snap: &TerminalSnapshot<'_>, color: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", snap.title);
    if snap.emergency {
        let banner = "  [EMERGENCY SHUTDOWN]";
        let _ = write!(
            out,
            "{}",
            if color {
                banner.red().bold().to_string()
            } else {
                banner.to_owned()
            }
        );
    }
    let _ = write!(out, "\nAfter {} simulation step(s)", snap.ticks);

    for tab in &snap.tabs {
        let _ = write!(out, "\n\n── {} ──", tab.title);
        for w in &tab.widgets {
            let line = match w {
                WidgetSnapshot::Gauge {
                    label,
                    value,
                    unit,
                    ratio,
                    level,
                } => format!(
                    "{label:<22} {} {}",
                    paint_level(&bar(*ratio), *level, color),
                    value.map_or_else(|| "--".into(), |v| format!("{v:.1} {unit}"))
                ),
                WidgetSnapshot::Display {
                    label, text, alarm, ..
                } => {
                    let level = if *alarm { Level::Danger } else { Level::Normal };
                    format!("{label:<22} {}", paint_level(text, level, color && *alarm))
                }
                WidgetSnapshot::Toggle { label, on, .. } => {
                    format!("{label:<22} [{}]", if *on { "ON " } else { "OFF" })
                }
                WidgetSnapshot::Led { label, color: c } => {
                    format!("{label:<22} {}", led_glyph(*c, color))
                }
                WidgetSnapshot::Slider {
                    label,
                    setpoint,
                    min,
                    max,
                    unit,
                } => format!(
                    "{label:<22} {} {unit}  ({min}..{max})",
                    setpoint.map_or_else(|| "--".into(), |v| format!("{v:.0}"))
                ),
                WidgetSnapshot::Button { label, .. } => format!("< {label} >"),
            };
            let _ = write!(out, "\n  {line}");
        }
    }

    if !snap.audit.is_empty() {
        let _ = write!(out, "\n\n── Log ──");
        for entry in &snap.audit {
            let _ = write!(
                out,
                "\n  {}  {}",
                entry.at.format("%H:%M:%S"),
                entry.message
            );
        }
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    dashboard: &Dashboard,
    args: &TerminalArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut session = dashboard.open_terminal(&FacilityId::from(args.id.as_str()))?;
    let signals = session.schema().signals;
    let mut telemetry = args
        .seed
        .map_or_else(|| Telemetry::new(signals), |seed| Telemetry::seeded(signals, seed));

    if args.emergency {
        for command in session.emergency_shutdown() {
            telemetry.apply(&command);
        }
    }
    for _ in 0..args.ticks {
        telemetry.step();
    }

    let readings = telemetry.readings();
    let tabs = session
        .schema()
        .tabs
        .iter()
        .map(|tab| TabSnapshot {
            title: tab.title,
            widgets: tab
                .widgets
                .iter()
                .map(|w| widget_snapshot(&session, readings, w))
                .collect(),
        })
        .collect();
    let snap = TerminalSnapshot {
        facility: session.facility(),
        title: session.title(),
        ticks: args.ticks,
        emergency: session.is_emergency(),
        readings,
        tabs,
        audit: session.audit().collect(),
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &snap,
        |s| detail(s, color),
        |s| {
            s.readings
                .iter()
                .map(|(k, v)| format!("{k}={v:.2}"))
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
