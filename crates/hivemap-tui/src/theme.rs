//! Palette and semantic styles for the TUI.

use ratatui::style::{Color, Modifier, Style};

use hivemap_core::terminal::{LedColor, Level};
use hivemap_core::{FacilityStatus, FacilityType};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29
pub const LIGHT_BLUE: Color = Color::Rgb(139, 233, 253); // #8be9fd
pub const COASTLINE: Color = Color::Rgb(68, 71, 90); // #44475a

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Full-width critical alert banner.
pub fn alert_banner() -> Style {
    Style::default()
        .fg(BG_DARK)
        .bg(ERROR_RED)
        .add_modifier(Modifier::BOLD)
}

// ── Domain colors ─────────────────────────────────────────────────────

pub fn status_color(status: FacilityStatus) -> Color {
    match status {
        FacilityStatus::Active => SUCCESS_GREEN,
        FacilityStatus::Critical => ERROR_RED,
        FacilityStatus::Offline => BORDER_GRAY,
    }
}

/// Marker color per facility category on the map.
pub fn type_color(kind: FacilityType) -> Color {
    match kind {
        FacilityType::Power | FacilityType::Energy => ELECTRIC_YELLOW,
        FacilityType::Airport | FacilityType::Port | FacilityType::Metro => LIGHT_BLUE,
        FacilityType::Server | FacilityType::Control => ELECTRIC_PURPLE,
        FacilityType::Gov | FacilityType::CityHall | FacilityType::Police => NEON_CYAN,
        FacilityType::Water | FacilityType::Bridge => Color::Rgb(98, 168, 255),
        FacilityType::Base => CORAL,
        FacilityType::Hospital | FacilityType::Fire => ERROR_RED,
        FacilityType::School | FacilityType::University => SUCCESS_GREEN,
    }
}

pub fn level_color(level: Level) -> Color {
    match level {
        Level::Normal => SUCCESS_GREEN,
        Level::Warning => ELECTRIC_YELLOW,
        Level::Danger => ERROR_RED,
    }
}

pub fn led_color(color: LedColor) -> Color {
    match color {
        LedColor::Green => SUCCESS_GREEN,
        LedColor::Yellow => ELECTRIC_YELLOW,
        LedColor::Red => ERROR_RED,
        LedColor::Off => COASTLINE,
    }
}

/// Heatmap shade for an intensity in `[0, 1]`, dimmed by the overlay
/// opacity.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn heat_color(intensity: f64, opacity: f64) -> Color {
    let t = (intensity * opacity).clamp(0.0, 1.0);
    let channel = |lo: f64, hi: f64| (lo + (hi - lo) * t).round() as u8;
    Color::Rgb(channel(60.0, 255.0), channel(40.0, 99.0), channel(80.0, 99.0))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn heat_color_scales_with_opacity() {
        assert_eq!(heat_color(1.0, 1.0), Color::Rgb(255, 99, 99));
        assert_eq!(heat_color(1.0, 0.0), Color::Rgb(60, 40, 80));
        assert_eq!(heat_color(0.3, 0.0), heat_color(0.0, 1.0));
    }
}
