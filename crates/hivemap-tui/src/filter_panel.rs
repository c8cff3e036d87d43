//! Filter panel overlay: checkbox lists for types, statuses and countries.
//!
//! The panel never edits criteria itself. Each toggle becomes an action
//! the app applies to the shared [`UiStore`](hivemap_core::UiStore); the
//! panel then mirrors the new criteria from `UiStateChanged`.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};
use strum::IntoEnumIterator;

use hivemap_core::locale::KNOWN_COUNTRIES;
use hivemap_core::{DashboardConfig, FacilityStatus, FacilityType, FilterCriteria, Locale};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::popup;

const PANEL_WIDTH: u16 = 46;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Type(FacilityType),
    Status(FacilityStatus),
    Country(String),
}

impl Entry {
    fn section(&self) -> &'static str {
        match self {
            Self::Type(_) => "type",
            Self::Status(_) => "status",
            Self::Country(_) => "country",
        }
    }

    fn action(&self) -> Action {
        match self {
            Self::Type(kind) => Action::ToggleType(*kind),
            Self::Status(status) => Action::ToggleStatus(*status),
            Self::Country(code) => Action::ToggleCountry(code.clone()),
        }
    }
}

pub struct FilterPanel {
    locale: Locale,
    criteria: FilterCriteria,
    entries: Vec<Entry>,
    list_state: ListState,
}

impl FilterPanel {
    pub fn new(config: &DashboardConfig) -> Self {
        let mut panel = Self {
            locale: config.locale,
            criteria: FilterCriteria::default(),
            entries: Vec::new(),
            list_state: ListState::default().with_selected(Some(0)),
        };
        panel.rebuild(std::iter::empty());
        panel
    }

    /// Known countries first, then any others present in the data.
    fn rebuild<'a>(&mut self, data_countries: impl Iterator<Item = &'a str>) {
        let mut countries: Vec<String> = KNOWN_COUNTRIES.iter().map(|c| (*c).to_owned()).collect();
        for code in data_countries {
            if !countries.iter().any(|c| c == code) {
                countries.push(code.to_owned());
            }
        }

        self.entries = FacilityType::iter()
            .map(Entry::Type)
            .chain(FacilityStatus::iter().map(Entry::Status))
            .chain(countries.into_iter().map(Entry::Country))
            .collect();

        let max = self.entries.len().saturating_sub(1);
        self.list_state
            .select(Some(self.list_state.selected().unwrap_or(0).min(max)));
    }

    fn is_checked(&self, entry: &Entry) -> bool {
        match entry {
            Entry::Type(kind) => self.criteria.types.contains(kind),
            Entry::Status(status) => self.criteria.statuses.contains(status),
            Entry::Country(code) => self.criteria.countries.contains(code),
        }
    }

    fn label(&self, entry: &Entry) -> String {
        match entry {
            Entry::Type(kind) => self.locale.type_label(*kind).to_owned(),
            Entry::Status(status) => self.locale.status_label(*status).to_owned(),
            Entry::Country(code) => match self.locale.country_label(code) {
                Some(name) => format!("{name} ({code})"),
                None => code.clone(),
            },
        }
    }

    fn cursor(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let next = if down {
            (self.cursor() + 1).min(len - 1)
        } else {
            self.cursor().saturating_sub(1)
        };
        self.list_state.select(Some(next));
    }
}

impl Component for FilterPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(true);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(false);
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.entries.get(self.cursor()).map(Entry::action),
            KeyCode::Char('R') => Some(Action::ResetFilters),
            KeyCode::Esc | KeyCode::Char('f') => Some(Action::ToggleFilterPanel),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::FacilitiesLoaded { facilities, .. } => {
                self.rebuild(facilities.iter().map(|f| f.country.as_str()));
            }
            Action::UiStateChanged(state) => {
                self.criteria = state.criteria.clone();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let height = u16::try_from(self.entries.len() + 4).unwrap_or(u16::MAX);
        let panel_area = popup::centered(area, PANEL_WIDTH, height);
        popup::clear(frame, panel_area);

        let title = if self.criteria.is_active() {
            " Filters (active) "
        } else {
            " Filters "
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(panel_area);
        frame.render_widget(block, panel_area);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let checked = self.is_checked(entry);
                let mark = if checked { "[x]" } else { "[ ]" };
                let mark_style = if checked {
                    Style::default()
                        .fg(theme::SUCCESS_GREEN)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::BORDER_GRAY)
                };
                let label_style = match entry {
                    Entry::Type(kind) => Style::default().fg(theme::type_color(*kind)),
                    Entry::Status(status) => Style::default().fg(theme::status_color(*status)),
                    Entry::Country(_) => Style::default().fg(theme::DIM_WHITE),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {:<8}", entry.section()), theme::key_hint()),
                    Span::styled(mark, mark_style),
                    Span::raw(" "),
                    Span::styled(self.label(entry), label_style),
                ]))
            })
            .collect();

        let list_height = inner.height.saturating_sub(1);
        let list_area = Rect::new(inner.x, inner.y, inner.width, list_height);
        let hint_area = Rect::new(inner.x, inner.y + list_height, inner.width, 1);

        let list = List::new(items).highlight_style(theme::table_selected());
        frame.render_stateful_widget(list, list_area, &mut self.list_state.clone());

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Space ", theme::key_hint_key()),
                Span::styled("toggle  ", theme::key_hint()),
                Span::styled("R ", theme::key_hint_key()),
                Span::styled("reset  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("close", theme::key_hint()),
            ])),
            hint_area,
        );
    }

    fn id(&self) -> &'static str {
        "Filters"
    }
}
