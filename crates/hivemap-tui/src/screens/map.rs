//! Map screen: facility markers, clusters and overlay layers on a world
//! canvas, with a side panel for the selected facility.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine, Map, MapResolution};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use hivemap_core::overlay::{self, Cluster, Connection, HeatPoint, RAIL_STATIONS, RailStation};
use hivemap_core::{
    DashboardConfig, Facility, FacilityId, FacilityStatus, Locale, Snapshot, UiState, filter,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// Rail segments drawn by the rail layer, by station name.
const RAIL_LINKS: &[(&str, &str)] = &[
    ("Hamburg Hbf", "Berlin Hauptbahnhof"),
    ("Hamburg Hbf", "Frankfurt (Main) Hbf"),
    ("Frankfurt (Main) Hbf", "München Hbf"),
    ("Berlin Hauptbahnhof", "München Hbf"),
];

const EUROPE: ([f64; 2], [f64; 2]) = ([-12.0, 42.0], [34.0, 72.0]);
const WORLD: ([f64; 2], [f64; 2]) = ([-180.0, 180.0], [-90.0, 90.0]);
const FIT_MARGIN: f64 = 2.0;
const FIT_MIN_SPAN: f64 = 8.0;

// Heat circle radius in degrees: base plus a share scaled by intensity.
const HEAT_RADIUS_BASE: f64 = 0.4;
const HEAT_RADIUS_SCALE: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewport {
    /// Tight bounds around the visible facilities.
    #[default]
    Fit,
    Europe,
    World,
}

impl Viewport {
    fn next(self) -> Self {
        match self {
            Self::Fit => Self::Europe,
            Self::Europe => Self::World,
            Self::World => Self::Fit,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Europe => "europe",
            Self::World => "world",
        }
    }

    /// `([west, east], [south, north])` for the canvas.
    pub fn bounds(self, facilities: &[Arc<Facility>]) -> ([f64; 2], [f64; 2]) {
        match self {
            Self::Europe => EUROPE,
            Self::World => WORLD,
            Self::Fit => {
                if facilities.is_empty() {
                    return EUROPE;
                }
                let (mut west, mut east) = (f64::MAX, f64::MIN);
                let (mut south, mut north) = (f64::MAX, f64::MIN);
                for f in facilities {
                    west = west.min(f.position.lon());
                    east = east.max(f.position.lon());
                    south = south.min(f.position.lat());
                    north = north.max(f.position.lat());
                }
                let widen = |lo: f64, hi: f64, limit: f64| {
                    let pad = (FIT_MIN_SPAN - (hi - lo)).max(0.0) / 2.0 + FIT_MARGIN;
                    [(lo - pad).max(-limit), (hi + pad).min(limit)]
                };
                (widen(west, east, 180.0), widen(south, north, 90.0))
            }
        }
    }
}

pub struct MapScreen {
    focused: bool,
    locale: Locale,
    connection_pairs: Vec<(String, String)>,
    cell_degrees: f64,
    facilities: Snapshot,
    ui: UiState,
    visible: Vec<Arc<Facility>>,
    clusters: Vec<Cluster>,
    heat: Vec<HeatPoint>,
    connections: Vec<Connection>,
    viewport: Viewport,
}

impl MapScreen {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            focused: false,
            locale: config.locale,
            connection_pairs: config.connections.clone(),
            cell_degrees: config.cluster_cell_degrees,
            facilities: Arc::new(Vec::new()),
            ui: UiState::default(),
            visible: Vec::new(),
            clusters: Vec::new(),
            heat: Vec::new(),
            connections: Vec::new(),
            viewport: Viewport::default(),
        }
    }

    fn recompute(&mut self) {
        self.visible = filter::apply(Some(self.facilities.as_slice()), &self.ui.criteria);
        self.clusters = overlay::cluster(&self.visible, self.cell_degrees);
        self.heat = overlay::heat_points(&self.facilities);
        self.connections = overlay::connections(&self.facilities, &self.connection_pairs);
    }

    fn find(&self, id: &FacilityId) -> Option<&Arc<Facility>> {
        self.visible.iter().find(|f| &f.id == id)
    }

    fn selected_index(&self) -> Option<usize> {
        let id = self.ui.selected.as_ref()?;
        self.visible.iter().position(|f| &f.id == id)
    }

    fn selected(&self) -> Option<&Arc<Facility>> {
        self.selected_index().and_then(|i| self.visible.get(i))
    }

    /// Select the visible facility `delta` steps away, wrapping around.
    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn step_selection(&self, delta: isize) -> Option<Action> {
        let len = self.visible.len();
        if len == 0 {
            return None;
        }
        let next = match self.selected_index() {
            Some(i) => (i as isize + delta).rem_euclid(len as isize) as usize,
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.visible
            .get(next)
            .map(|f| Action::SelectFacility(Some(f.id.clone())))
    }

    fn paint(&self, ctx: &mut Context<'_>) {
        ctx.draw(&Map {
            color: theme::COASTLINE,
            resolution: MapResolution::High,
        });

        if self.ui.show_heatmap {
            for point in &self.heat {
                ctx.draw(&Circle {
                    x: point.position.lon(),
                    y: point.position.lat(),
                    radius: HEAT_RADIUS_BASE + HEAT_RADIUS_SCALE * point.intensity,
                    color: theme::heat_color(point.intensity, self.ui.overlay_opacity),
                });
            }
        }

        if self.ui.show_rail_layer {
            for (a, b) in RAIL_LINKS {
                let (Some(a), Some(b)) = (station(a), station(b)) else {
                    continue;
                };
                ctx.draw(&CanvasLine::new(a.lon, a.lat, b.lon, b.lat, theme::LIGHT_BLUE));
            }
        }

        if self.ui.show_connections {
            for c in &self.connections {
                ctx.draw(&CanvasLine::new(
                    c.from_position.lon(),
                    c.from_position.lat(),
                    c.to_position.lon(),
                    c.to_position.lat(),
                    theme::CORAL,
                ));
            }
        }

        ctx.layer();

        if self.ui.show_stations {
            for s in RAIL_STATIONS {
                ctx.print(
                    s.lon,
                    s.lat,
                    Span::styled("▣", Style::default().fg(theme::LIGHT_BLUE)),
                );
            }
        }

        for cluster in &self.clusters {
            if cluster.len() > 1 {
                let color = if cluster.critical > 0 {
                    theme::ERROR_RED
                } else {
                    theme::NEON_CYAN
                };
                ctx.print(
                    cluster.center.lon(),
                    cluster.center.lat(),
                    Span::styled(
                        format!("({})", cluster.len()),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                );
            } else if let Some(f) = cluster.members.first().and_then(|id| self.find(id)) {
                ctx.print(f.position.lon(), f.position.lat(), marker(f));
            }
        }

        if let Some(f) = self.selected() {
            ctx.print(
                f.position.lon(),
                f.position.lat(),
                Span::styled(
                    format!("◆ {}", f.name),
                    Style::default()
                        .fg(theme::ELECTRIC_PURPLE)
                        .add_modifier(Modifier::BOLD),
                ),
            );
        }
    }

    fn render_info(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Facility ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = |text: &'static str| Span::styled(text, Style::default().fg(theme::DIM_WHITE));
        let mut lines = Vec::new();

        if let Some(f) = self.selected() {
            lines.push(Line::from(Span::styled(
                f.name.clone(),
                Style::default()
                    .fg(theme::NEON_CYAN)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(vec![
                Span::styled(
                    self.locale.type_label(f.kind),
                    Style::default().fg(theme::type_color(f.kind)),
                ),
                Span::raw(" · "),
                Span::styled(
                    self.locale.status_label(f.status),
                    Style::default().fg(theme::status_color(f.status)),
                ),
            ]));
            let country = self
                .locale
                .country_label(&f.country)
                .map_or_else(|| f.country.clone(), |name| format!("{name} ({})", f.country));
            lines.push(Line::from(vec![label("Country  "), Span::raw(country)]));
            lines.push(Line::from(vec![
                label("Position "),
                Span::raw(format!(
                    "{:.3}, {:.3}",
                    f.position.lat(),
                    f.position.lon()
                )),
            ]));
            if let Some(last) = f.last_change() {
                lines.push(Line::from(vec![
                    label("Changed  "),
                    Span::raw(last.timestamp.format("%Y-%m-%d %H:%M").to_string()),
                ]));
            }
            if let Some(ref description) = f.description {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    description.clone(),
                    Style::default().fg(theme::DIM_WHITE),
                )));
            }
            if let Some(ref url) = f.info_url {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    url.clone(),
                    Style::default()
                        .fg(theme::LIGHT_BLUE)
                        .add_modifier(Modifier::UNDERLINED),
                )));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "Nothing selected",
                Style::default().fg(theme::BORDER_GRAY),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Layers", theme::title_style())));
        for (key, name, on) in [
            ("c", "Connections", self.ui.show_connections),
            ("r", "Rail network", self.ui.show_rail_layer),
            ("h", "Heatmap", self.ui.show_heatmap),
            ("s", "Stations", self.ui.show_stations),
        ] {
            lines.push(Line::from(vec![
                Span::styled(format!(" {key} "), theme::key_hint_key()),
                Span::styled(
                    if on { "■ " } else { "□ " },
                    Style::default().fg(if on {
                        theme::SUCCESS_GREEN
                    } else {
                        theme::BORDER_GRAY
                    }),
                ),
                Span::styled(name, theme::table_row()),
            ]));
        }
        lines.push(Line::from(vec![
            Span::styled(" +/- ", theme::key_hint_key()),
            Span::styled(
                format!("opacity {:.0}%", self.ui.overlay_opacity * 100.0),
                theme::table_row(),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled(" z ", theme::key_hint_key()),
            Span::styled(format!("view {}", self.viewport.label()), theme::table_row()),
        ]));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}

fn station(name: &str) -> Option<&'static RailStation> {
    RAIL_STATIONS.iter().find(|s| s.name == name)
}

fn marker(f: &Facility) -> Span<'static> {
    let (glyph, color) = match f.status {
        FacilityStatus::Active => ("●", theme::type_color(f.kind)),
        FacilityStatus::Critical => ("▲", theme::ERROR_RED),
        FacilityStatus::Offline => ("○", theme::BORDER_GRAY),
    };
    Span::styled(glyph, Style::default().fg(color))
}

impl Component for MapScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Char('j') | KeyCode::Right | KeyCode::Down => self.step_selection(1),
            KeyCode::Char('k') | KeyCode::Left | KeyCode::Up => self.step_selection(-1),
            KeyCode::Enter => self.selected().map(|f| Action::OpenTerminal(f.id.clone())),
            KeyCode::Char('z') => {
                self.viewport = self.viewport.next();
                None
            }
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::FacilitiesLoaded { facilities, .. } => {
                self.facilities = Arc::clone(facilities);
                self.recompute();
            }
            Action::UiStateChanged(state) => {
                self.ui = (**state).clone();
                self.recompute();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [map_area, info_area] =
            Layout::horizontal([Constraint::Min(30), Constraint::Length(36)]).areas(area);

        let (x_bounds, y_bounds) = self.viewport.bounds(&self.visible);
        let title = format!(
            " Map · {} ",
            self.locale.results(self.visible.len(), self.facilities.len())
        );
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| self.paint(ctx));
        frame.render_widget(canvas, map_area);

        self.render_info(frame, info_area);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Map"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use hivemap_core::{FilterCriteria, LoadReport};

    use super::*;
    use crate::testing::{facility, render_to_string};

    fn loaded() -> MapScreen {
        let mut screen = MapScreen::new(&DashboardConfig::default());
        let facilities = Arc::new(vec![
            facility("power-1", "Brokdorf", "power", "critical", "DE", 53.86, 9.34),
            facility("base-1", "Ramstein", "base", "active", "DE", 49.43, 7.60),
            facility("airport-1", "Schiphol", "airport", "offline", "NL", 52.31, 4.76),
        ]);
        screen
            .update(&Action::FacilitiesLoaded {
                facilities,
                report: LoadReport {
                    accepted: 3,
                    rejected: 0,
                },
            })
            .unwrap();
        screen
    }

    #[test]
    fn fit_bounds_pad_the_visible_extent() {
        let screen = loaded();
        let (x, y) = Viewport::Fit.bounds(&screen.visible);
        // both extents are narrower than the minimum span
        for (bounds, mid) in [(x, (4.76 + 9.34) / 2.0), (y, (49.43 + 53.86) / 2.0)] {
            let span = bounds[1] - bounds[0];
            assert!((span - (FIT_MIN_SPAN + 2.0 * FIT_MARGIN)).abs() < 1e-9);
            assert!(((bounds[0] + bounds[1]) / 2.0 - mid).abs() < 1e-9);
        }
        assert_eq!(Viewport::Fit.bounds(&[]), EUROPE);
    }

    #[test]
    fn selection_wraps_over_visible_facilities() {
        let mut screen = loaded();
        let first = screen.step_selection(1);
        assert!(
            matches!(first, Some(Action::SelectFacility(Some(ref id))) if id.as_str() == "power-1")
        );

        let mut ui = UiState::default();
        ui.selected = Some("power-1".into());
        screen.update(&Action::UiStateChanged(Box::new(ui))).unwrap();
        let back = screen.step_selection(-1);
        assert!(
            matches!(back, Some(Action::SelectFacility(Some(ref id))) if id.as_str() == "airport-1")
        );
    }

    #[test]
    fn criteria_narrow_markers_and_clusters() {
        let mut screen = loaded();
        let mut ui = UiState::default();
        ui.criteria = FilterCriteria::new().with_country("NL");
        screen.update(&Action::UiStateChanged(Box::new(ui))).unwrap();

        assert_eq!(screen.visible.len(), 1);
        assert_eq!(screen.clusters.len(), 1);
        // overlays derive from the whole collection
        assert_eq!(screen.heat.len(), 3);
        assert_eq!(screen.connections.len(), 1);
    }

    #[test]
    fn enter_opens_the_selected_terminal() {
        let mut screen = loaded();
        let mut ui = UiState::default();
        ui.selected = Some("base-1".into());
        screen.update(&Action::UiStateChanged(Box::new(ui))).unwrap();

        let action = screen
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        assert!(matches!(action, Some(Action::OpenTerminal(ref id)) if id.as_str() == "base-1"));
    }

    #[test]
    fn side_panel_lists_layers() {
        let screen = loaded();
        let out = render_to_string(&screen, 100, 30);
        assert!(out.contains("Results: 3 of 3 shown"));
        assert!(out.contains("Connections"));
        assert!(out.contains("Nothing selected"));
    }
}
