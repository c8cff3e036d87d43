//! Centered overlay placement.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Clear};
use ratatui::Frame;

use crate::theme;

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Clear `area` and paint the dark popup background.
pub fn clear(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_and_clamps() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered(area, 50, 10), Rect::new(25, 15, 50, 10));
        assert_eq!(centered(Rect::new(0, 0, 20, 8), 50, 10), Rect::new(1, 1, 18, 6));
    }
}
