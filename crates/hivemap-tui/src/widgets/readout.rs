//! Text renditions of terminal readouts: fill bars, values and LEDs.

use ratatui::style::Style;
use ratatui::text::Span;

use hivemap_core::terminal::LedColor;

use crate::theme;

/// A fixed-width fill bar for `ratio` in `[0, 1]`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::as_conversions
)]
pub fn bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// `value` with `decimals` digits and an optional unit suffix.
pub fn value(value: f64, decimals: usize, unit: &str) -> String {
    if unit.is_empty() {
        format!("{value:.decimals$}")
    } else {
        format!("{value:.decimals$} {unit}")
    }
}

pub fn led(color: LedColor) -> Span<'static> {
    let glyph = if color == LedColor::Off { "○" } else { "●" };
    Span::styled(glyph, Style::default().fg(theme::led_color(color)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bars_and_values() {
        assert_eq!(bar(0.5, 4), "██░░");
        assert_eq!(bar(1.7, 3), "███");
        assert_eq!(bar(-1.0, 2), "░░");
        assert_eq!(value(87.456, 1, "°C"), "87.5 °C");
        assert_eq!(value(3.0, 0, ""), "3");
    }

    #[test]
    fn off_leds_are_hollow() {
        assert_eq!(led(LedColor::Off).content, "○");
        assert_eq!(led(LedColor::Red).content, "●");
    }
}
