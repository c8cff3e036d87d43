//! Test helpers: fixture facilities and off-screen rendering.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use hivemap_core::{Facility, Position, SourceRecord};

use crate::component::Component;

pub fn facility(
    id: &str,
    name: &str,
    kind: &str,
    status: &str,
    country: &str,
    lat: f64,
    lon: f64,
) -> Arc<Facility> {
    Arc::new(Facility {
        id: id.into(),
        name: name.into(),
        kind: kind.parse().unwrap(),
        status: status.parse().unwrap(),
        country: country.into(),
        position: Position::new(lat, lon).unwrap(),
        description: None,
        history: Vec::new(),
        info_url: None,
        source: SourceRecord::new(),
    })
}

/// Render `component` into a `width` x `height` buffer, one line per row.
pub fn render_to_string(component: &dyn Component, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal
        .draw(|frame| component.render(frame, frame.area()))
        .unwrap();

    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
