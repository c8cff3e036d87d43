//! Facilities screen: the filtered facility table with a detail pane.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use hivemap_core::{DashboardConfig, Facility, FacilityId, FilterCriteria, Locale, Snapshot, filter};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// History entries shown in the detail pane.
const HISTORY_LINES: usize = 4;

pub struct FacilitiesScreen {
    focused: bool,
    locale: Locale,
    facilities: Snapshot,
    criteria: FilterCriteria,
    selected_id: Option<FacilityId>,
    visible: Vec<Arc<Facility>>,
    table_state: TableState,
}

impl FacilitiesScreen {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            focused: false,
            locale: config.locale,
            facilities: Arc::new(Vec::new()),
            criteria: FilterCriteria::default(),
            selected_id: None,
            visible: Vec::new(),
            table_state: TableState::default(),
        }
    }

    fn recompute(&mut self) {
        self.visible = filter::apply(Some(self.facilities.as_slice()), &self.criteria);
        self.sync_selection();
    }

    /// Point the table cursor at the shared selection, or clamp it.
    fn sync_selection(&mut self) {
        let by_id = self
            .selected_id
            .as_ref()
            .and_then(|id| self.visible.iter().position(|f| &f.id == id));
        let idx = by_id.or_else(|| {
            (!self.visible.is_empty())
                .then(|| self.selected_index().min(self.visible.len() - 1))
        });
        self.table_state.select(idx);
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected(&self) -> Option<&Arc<Facility>> {
        self.visible.get(self.selected_index())
    }

    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn move_selection(&mut self, delta: isize) -> Option<Action> {
        let len = self.visible.len();
        if len == 0 {
            return None;
        }
        let current = self.selected_index() as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.select(next)
    }

    fn select(&mut self, idx: usize) -> Option<Action> {
        self.table_state.select(Some(idx));
        let id = self.visible.get(idx)?.id.clone();
        self.selected_id = Some(id.clone());
        Some(Action::SelectFacility(Some(id)))
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            " Facilities · {} ",
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

        let header = Row::new(["ID", "Name", "Type", "Status", "Country", "Changed"])
            .style(theme::table_header());

        let rows = self.visible.iter().map(|f| {
            let changed = f
                .last_change()
                .map_or_else(|| "─".into(), |h| h.timestamp.format("%Y-%m-%d").to_string());
            Row::new(vec![
                Cell::from(f.id.to_string()),
                Cell::from(f.name.clone()),
                Cell::from(Span::styled(
                    self.locale.type_label(f.kind),
                    Style::default().fg(theme::type_color(f.kind)),
                )),
                Cell::from(Span::styled(
                    self.locale.status_label(f.status),
                    Style::default().fg(theme::status_color(f.status)),
                )),
                Cell::from(f.country.clone()),
                Cell::from(changed),
            ])
            .style(theme::table_row())
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Min(20),
                Constraint::Length(16),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(11),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(theme::table_selected())
        .highlight_symbol("▸ ");

        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Detail ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(f) = self.selected() else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  No facility matches the active filters",
                    Style::default().fg(theme::BORDER_GRAY),
                )),
                inner,
            );
            return;
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(
                format!("  {}", f.name),
                Style::default()
                    .fg(theme::NEON_CYAN)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "  {:.4}, {:.4}",
                    f.position.lat(),
                    f.position.lon()
                ),
                theme::key_hint(),
            ),
        ])];
        if let Some(ref description) = f.description {
            lines.push(Line::from(Span::styled(
                format!("  {description}"),
                Style::default().fg(theme::DIM_WHITE),
            )));
        }

        let mut history: Vec<_> = f.history.iter().collect();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        for entry in history.into_iter().take(HISTORY_LINES) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}  ", entry.timestamp.format("%Y-%m-%d %H:%M")),
                    theme::key_hint(),
                ),
                Span::styled(
                    self.locale.status_label(entry.status),
                    Style::default().fg(theme::status_color(entry.status)),
                ),
            ]));
        }

        if let Some(ref url) = f.info_url {
            lines.push(Line::from(Span::styled(
                format!("  {url}"),
                Style::default().fg(theme::LIGHT_BLUE),
            )));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

impl Component for FacilitiesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(10)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(-10)
            }
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => {
                let len = self.visible.len();
                if len > 0 { self.select(len - 1) } else { None }
            }
            KeyCode::Enter => self.selected().map(|f| Action::OpenTerminal(f.id.clone())),
            _ => None,
        })
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        Ok(match mouse.kind {
            MouseEventKind::ScrollDown => self.move_selection(1),
            MouseEventKind::ScrollUp => self.move_selection(-1),
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
                self.selected_id.clone_from(&state.selected);
                if state.criteria == self.criteria {
                    self.sync_selection();
                } else {
                    self.criteria = state.criteria.clone();
                    self.recompute();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [table_area, detail_area] =
            Layout::vertical([Constraint::Min(5), Constraint::Length(9)]).areas(area);
        self.render_table(frame, table_area);
        self.render_detail(frame, detail_area);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Facilities"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use hivemap_core::{FacilityType, LoadReport, UiState};

    use super::*;
    use crate::testing::{facility, render_to_string};

    fn loaded() -> FacilitiesScreen {
        let mut screen = FacilitiesScreen::new(&DashboardConfig::default());
        let facilities = Arc::new(vec![
            facility("power-1", "Brokdorf", "power", "critical", "DE", 53.86, 9.34),
            facility("base-1", "Ramstein", "base", "active", "DE", 49.43, 7.60),
            facility("server-1", "Frankfurt DC", "server", "active", "DE", 50.11, 8.68),
            facility("airport-1", "Schiphol", "airport", "offline", "NL", 52.31, 4.76),
        ]);
        screen
            .update(&Action::FacilitiesLoaded {
                facilities,
                report: LoadReport {
                    accepted: 4,
                    rejected: 0,
                },
            })
            .unwrap();
        screen
    }

    fn ids(screen: &FacilitiesScreen) -> Vec<&str> {
        screen.visible.iter().map(|f| f.id.as_str()).collect()
    }

    fn selected_id(action: Option<Action>) -> Option<String> {
        match action {
            Some(Action::SelectFacility(Some(id))) => Some(id.to_string()),
            _ => None,
        }
    }

    #[test]
    fn moving_the_cursor_selects_facilities() {
        let mut screen = loaded();
        assert_eq!(screen.table_state.selected(), Some(0));

        let down = screen.handle_key_event(KeyEvent::from(KeyCode::Down)).unwrap();
        assert_eq!(selected_id(down).as_deref(), Some("base-1"));

        let end = screen.handle_key_event(KeyEvent::from(KeyCode::Char('G'))).unwrap();
        assert_eq!(selected_id(end).as_deref(), Some("airport-1"));

        let past_end = screen.handle_key_event(KeyEvent::from(KeyCode::Char('j'))).unwrap();
        assert_eq!(selected_id(past_end).as_deref(), Some("airport-1"));
    }

    #[test]
    fn criteria_changes_refilter_in_order() {
        let mut screen = loaded();
        let mut ui = UiState::default();
        ui.criteria = FilterCriteria::new()
            .with_type(FacilityType::Server)
            .with_type(FacilityType::Power);
        screen.update(&Action::UiStateChanged(Box::new(ui))).unwrap();

        assert_eq!(ids(&screen), vec!["power-1", "server-1"]);
    }

    #[test]
    fn follows_the_shared_selection() {
        let mut screen = loaded();
        let mut ui = UiState::default();
        ui.selected = Some("server-1".into());
        screen.update(&Action::UiStateChanged(Box::new(ui))).unwrap();

        assert_eq!(screen.table_state.selected(), Some(2));
        let open = screen.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap();
        assert!(matches!(open, Some(Action::OpenTerminal(ref id)) if id.as_str() == "server-1"));
    }

    #[test]
    fn empty_result_renders_placeholder() {
        let mut screen = loaded();
        let mut ui = UiState::default();
        ui.criteria = FilterCriteria::new().with_search("nothing like this");
        screen.update(&Action::UiStateChanged(Box::new(ui))).unwrap();

        assert!(screen.visible.is_empty());
        assert_eq!(screen.table_state.selected(), None);
        let out = render_to_string(&screen, 100, 20);
        assert!(out.contains("Results: 0 of 4 shown"));
        assert!(out.contains("No facility matches the active filters"));
    }
}
