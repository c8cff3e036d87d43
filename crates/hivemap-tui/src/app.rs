//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tui_input::{Input, InputRequest};

use hivemap_core::export::DEFAULT_FILE_NAME;
use hivemap_core::terminal::ButtonAction;
use hivemap_core::{Dashboard, FacilityId, LoadState, Snapshot, UiState};

use crate::action::{Action, ConfirmAction, Layer, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::{spawn_data_bridge, spawn_feed_bridge};
use crate::event::{Event, EventReader};
use crate::filter_panel::FilterPanel;
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::terminal_view::TerminalView;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::popup;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);
const OPACITY_STEP: f64 = 0.1;

/// Top-level application state and event loop.
pub struct App {
    dashboard: Dashboard,
    active_screen: ScreenId,
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    filter_panel: FilterPanel,
    filter_panel_visible: bool,
    /// Open facility terminal, drawn over everything but dialogs.
    terminal: Option<TerminalView>,
    running: bool,
    help_visible: bool,
    search_active: bool,
    search: Input,
    load_state: LoadState,
    facilities: Snapshot,
    ui: UiState,
    throbber_state: ThrobberState,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancels the data bridge and every feed bridge.
    data_cancel: CancellationToken,
    /// Blocks other input while shown.
    pending_confirm: Option<ConfirmAction>,
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(dashboard.config()).into_iter().collect();
        let filter_panel = FilterPanel::new(dashboard.config());
        let ui = dashboard.ui().snapshot();
        let facilities = dashboard.facilities();

        Self {
            dashboard,
            active_screen: ScreenId::default(),
            previous_screen: None,
            screens,
            filter_panel,
            filter_panel_visible: false,
            terminal: None,
            running: true,
            help_visible: false,
            search_active: false,
            search: Input::default(),
            load_state: LoadState::Loading,
            facilities,
            ui,
            throbber_state: ThrobberState::default(),
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
            pending_confirm: None,
            notification: None,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (width, height) = tui.size().unwrap_or((80, 24));
        debug!(width, height, "terminal entered");
        self.init_screens()?;

        tokio::spawn(spawn_data_bridge(
            self.dashboard.clone(),
            self.action_tx.clone(),
            self.data_cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.terminal = None;
        self.data_cancel.cancel();
        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Overlays capture input first, then
    /// global keys, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.search_active {
            return Ok(self.handle_search_key(key));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if self.filter_panel_visible {
            return self.filter_panel.handle_key_event(key);
        }

        if let Some(ref mut terminal) = self.terminal {
            return terminal.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('/')) => return Ok(Some(Action::OpenSearch)),
            (KeyModifiers::NONE, KeyCode::Char('f')) => {
                return Ok(Some(Action::ToggleFilterPanel));
            }
            (KeyModifiers::NONE, KeyCode::Char('c')) => {
                return Ok(Some(Action::ToggleLayer(Layer::Connections)));
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                return Ok(Some(Action::ToggleLayer(Layer::Rail)));
            }
            (KeyModifiers::NONE, KeyCode::Char('h')) => {
                return Ok(Some(Action::ToggleLayer(Layer::Heatmap)));
            }
            (KeyModifiers::NONE, KeyCode::Char('s')) => {
                return Ok(Some(Action::ToggleLayer(Layer::Stations)));
            }
            (_, KeyCode::Char('+' | '=')) => {
                return Ok(Some(Action::AdjustOpacity(OPACITY_STEP)));
            }
            (KeyModifiers::NONE, KeyCode::Char('-')) => {
                return Ok(Some(Action::AdjustOpacity(-OPACITY_STEP)));
            }
            (KeyModifiers::NONE, KeyCode::Char('x')) => return Ok(Some(Action::ExportCsv)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let screen = c
                    .to_digit(10)
                    .and_then(|d| u8::try_from(d).ok())
                    .and_then(ScreenId::from_number);
                if let Some(screen) = screen {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Search line editing. Every edit re-filters immediately.
    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        let request = match key.code {
            KeyCode::Esc => return Some(Action::CloseSearch),
            KeyCode::Enter => return Some(Action::SearchSubmit),
            KeyCode::Char(c) => InputRequest::InsertChar(c),
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            _ => return None,
        };
        self.search
            .handle(request)
            .map(|_| Action::SearchInput(self.search.value().to_owned()))
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.terminal.is_some() || self.filter_panel_visible {
            return Ok(None);
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    /// Update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                debug!(width = w, height = h, "terminal resized");
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            // ── Search ────────────────────────────────────────────────
            Action::OpenSearch => {
                self.search_active = true;
                self.search = Input::new(self.ui.criteria.search.clone());
            }

            Action::SearchInput(query) => {
                let query = query.clone();
                self.dashboard.ui().update_criteria(|c| c.search = query);
            }

            Action::SearchSubmit => {
                self.search_active = false;
            }

            Action::CloseSearch => {
                self.search_active = false;
                self.search.reset();
                self.dashboard.ui().update_criteria(|c| c.search.clear());
            }

            // ── Filters ───────────────────────────────────────────────
            Action::ToggleFilterPanel => {
                self.filter_panel_visible = !self.filter_panel_visible;
            }

            Action::ToggleType(kind) => {
                self.dashboard.ui().update_criteria(|c| {
                    c.toggle_type(*kind);
                });
            }

            Action::ToggleStatus(status) => {
                self.dashboard.ui().update_criteria(|c| {
                    c.toggle_status(*status);
                });
            }

            Action::ToggleCountry(code) => {
                self.dashboard.ui().update_criteria(|c| {
                    c.toggle_country(code);
                });
            }

            Action::ResetFilters => {
                self.dashboard.ui().update_criteria(|c| c.clear());
                self.search.reset();
            }

            // ── Map layers ────────────────────────────────────────────
            Action::ToggleLayer(layer) => {
                let ui = self.dashboard.ui();
                match layer {
                    Layer::Connections => ui.set_show_connections(!ui.show_connections()),
                    Layer::Rail => ui.set_show_rail_layer(!ui.show_rail_layer()),
                    Layer::Heatmap => ui.set_show_heatmap(!ui.show_heatmap()),
                    Layer::Stations => ui.set_show_stations(!ui.show_stations()),
                }
            }

            Action::AdjustOpacity(delta) => {
                let ui = self.dashboard.ui();
                ui.set_overlay_opacity((ui.overlay_opacity() + delta).clamp(0.0, 1.0));
            }

            // ── Selection / terminals ─────────────────────────────────
            Action::SelectFacility(id) => {
                self.dashboard.ui().set_selected(id.clone());
            }

            Action::OpenTerminal(id) => self.open_terminal(id),

            Action::CloseTerminal => {
                if let Some(terminal) = self.terminal.take() {
                    debug!(terminal = terminal.id(), "terminal closed");
                }
            }

            Action::TerminalButton(_) | Action::ReadingsUpdated { .. } => {
                if let Some(ref mut terminal) = self.terminal {
                    if let Some(follow_up) = terminal.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            // ── Data ──────────────────────────────────────────────────
            Action::FacilitiesLoaded { facilities, report } => {
                self.facilities = facilities.clone();
                self.load_state = LoadState::Loaded(*report);
                self.broadcast(action)?;
            }

            Action::LoadFailed(message) => {
                self.load_state = LoadState::Failed {
                    message: message.clone(),
                };
            }

            Action::UiStateChanged(state) => {
                self.ui = (**state).clone();
                self.broadcast(action)?;
            }

            // ── Export ────────────────────────────────────────────────
            Action::ExportCsv => {
                let path = PathBuf::from(DEFAULT_FILE_NAME);
                if path.exists() {
                    self.action_tx
                        .send(Action::ShowConfirm(ConfirmAction::OverwriteExport { path }))?;
                } else {
                    self.action_tx.send(Action::WriteExport(path))?;
                }
            }

            Action::WriteExport(path) => self.write_export(path),

            // ── Dialogs / notifications ───────────────────────────────
            Action::ShowConfirm(confirm) => {
                self.pending_confirm = Some(confirm.clone());
            }

            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.action_tx.send(Self::confirmed(confirm))?;
                }
            }

            Action::ConfirmNo => {
                self.pending_confirm = None;
            }

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }

            Action::Render => {}

            Action::Tick => {
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
                if self.load_state.is_loading() {
                    self.throbber_state.calc_next();
                }
            }
        }
        Ok(())
    }

    /// Data updates go to every screen and the filter panel.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        if let Some(follow_up) = self.filter_panel.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn confirmed(confirm: ConfirmAction) -> Action {
        match confirm {
            ConfirmAction::EmergencyShutdown { .. } => {
                Action::TerminalButton(ButtonAction::EmergencyShutdown)
            }
            ConfirmAction::PressButton { action, .. } => Action::TerminalButton(action),
            ConfirmAction::OverwriteExport { path } => Action::WriteExport(path),
        }
    }

    /// Open the terminal of `id` and start its feed bridge. Replaces any
    /// open terminal, whose bridge stops when the old view drops.
    fn open_terminal(&mut self, id: &FacilityId) {
        let session = match self.dashboard.open_terminal(id) {
            Ok(session) => session,
            Err(e) => {
                warn!(%id, error = %e, "cannot open terminal");
                let _ = self
                    .action_tx
                    .send(Action::Notify(Notification::error(e.to_string())));
                return;
            }
        };

        let feed = self.dashboard.spawn_feed(&session);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let cancel = self.data_cancel.child_token();
        tokio::spawn(spawn_feed_bridge(
            id.clone(),
            feed,
            command_rx,
            self.action_tx.clone(),
            cancel.clone(),
        ));

        info!(%id, title = session.title(), "terminal opened");
        let _ = self.action_tx.send(Action::SelectFacility(Some(id.clone())));
        self.terminal = Some(TerminalView::new(session, command_tx, cancel));
    }

    fn write_export(&self, path: &Path) {
        let csv = match self.dashboard.export_csv() {
            Ok(csv) => csv,
            Err(e) => {
                let _ = self
                    .action_tx
                    .send(Action::Notify(Notification::error(e.to_string())));
                return;
            }
        };

        let tx = self.action_tx.clone();
        let path = path.to_path_buf();
        let count = self.facilities.len();
        tokio::spawn(async move {
            let notification = match tokio::fs::write(&path, csv).await {
                Ok(()) => {
                    info!(path = %path.display(), count, "exported facilities");
                    Notification::success(format!(
                        "Exported {count} facilities to {}",
                        path.display()
                    ))
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "export failed");
                    Notification::error(format!("Export failed: {e}"))
                }
            };
            let _ = tx.send(Action::Notify(notification));
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let alert = self.dashboard.has_critical_alert();

        let [banner_area, content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Length(u16::from(alert)),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if alert {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" ▲ {} ", self.dashboard.locale().critical_alert()),
                    theme::alert_banner(),
                ))
                .style(theme::alert_banner()),
                banner_area,
            );
        }

        match self.load_state {
            LoadState::Loading => self.render_loading(frame, content_area),
            LoadState::Failed { ref message } => Self::render_load_error(frame, content_area, message),
            LoadState::Loaded(_) => {
                if let Some(screen) = self.screens.get(&self.active_screen) {
                    screen.render(frame, content_area);
                }
            }
        }

        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        // Overlays, last = topmost
        if self.filter_panel_visible {
            self.filter_panel.render(frame, content_area);
        }
        if let Some(ref terminal) = self.terminal {
            terminal.render(frame, content_area);
        }
        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
        if let Some(ref confirm) = self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let spot = popup::centered(inner, 30, 1);
        let throbber = Throbber::default()
            .label(self.dashboard.locale().loading())
            .style(Style::default().fg(theme::DIM_WHITE))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, spot, &mut self.throbber_state.clone());
    }

    fn render_load_error(frame: &mut Frame, area: Rect, message: &str) {
        let block = Block::default()
            .title(" Error ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ERROR_RED));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let spot = popup::centered(inner, u16::try_from(message.len() + 4).unwrap_or(u16::MAX), 3);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("✗ {message}"),
                    Style::default().fg(theme::ERROR_RED),
                )),
                Line::from(""),
                Line::from(Span::styled("q quit", theme::key_hint())),
            ])
            .centered(),
            spot,
        );
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if self.search_active {
            let prefix = " / ";
            let line = Line::from(vec![
                Span::styled(prefix, Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled(self.search.value(), Style::default().fg(theme::NEON_CYAN)),
                Span::styled("  Esc clear  Enter keep", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            let cursor = u16::try_from(prefix.len() + self.search.visual_cursor()).unwrap_or(0);
            frame.set_cursor_position((area.x + cursor, area.y));
            return;
        }

        let shown = hivemap_core::filter::count_matching(&self.facilities, &self.ui.criteria);
        let mut spans = vec![Span::styled(
            format!(
                " {} ",
                self.dashboard.locale().results(shown, self.facilities.len())
            ),
            Style::default().fg(theme::NEON_CYAN),
        )];
        if self.ui.criteria.is_active() {
            spans.push(Span::styled("● filtered ", Style::default().fg(theme::ELECTRIC_YELLOW)));
        }
        if !self.ui.criteria.search.is_empty() {
            spans.push(Span::styled(
                format!("/{} ", self.ui.criteria.search),
                Style::default().fg(theme::ELECTRIC_PURPLE),
            ));
        }
        spans.push(Span::styled(
            "│ ? help  / search  f filters  x export  q quit",
            theme::key_hint(),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = popup::centered(area, 60, 26);
        popup::clear(frame, help_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            [
                Line::from(Span::styled(
                    format!("  {title}"),
                    Style::default().fg(theme::NEON_CYAN),
                )),
                Line::from(Span::styled(
                    format!("  {}", "─".repeat(title.chars().count())),
                    theme::key_hint(),
                )),
            ]
        };
        let row = |key: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let mut text = vec![Line::from("")];
        text.extend(section("Navigation"));
        text.extend([
            row("1-2 Tab", "Switch screen"),
            row("j/k ↑/↓", "Select facility"),
            row("Enter", "Open terminal"),
            row("g/G", "Top / bottom"),
            row("Esc", "Back / close"),
        ]);
        text.push(Line::from(""));
        text.extend(section("Map"));
        text.extend([
            row("c r h s", "Connections, rail, heatmap, stations"),
            row("+/-", "Overlay opacity"),
            row("z", "Cycle viewport"),
        ]);
        text.push(Line::from(""));
        text.extend(section("Global"));
        text.extend([
            row("/", "Search"),
            row("f", "Filters"),
            row("x", "Export CSV"),
            row("?", "This help"),
            row("q", "Quit"),
        ]);
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            "                    Esc or ? to close",
            theme::key_hint(),
        )));

        frame.render_widget(Paragraph::new(text), inner);
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let prompt = confirm.to_string();
        let width = u16::try_from(prompt.chars().count() + 6)
            .unwrap_or(u16::MAX)
            .clamp(30, 72);
        let dialog_area = popup::centered(area, width, 5);
        popup::clear(frame, dialog_area);

        let border = match confirm {
            ConfirmAction::EmergencyShutdown { .. } => theme::ERROR_RED,
            _ => theme::ELECTRIC_YELLOW,
        };
        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!("  {prompt}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
            NotificationLevel::Warning => (theme::ELECTRIC_YELLOW, "!"),
            NotificationLevel::Info => (theme::NEON_CYAN, "·"),
        };

        popup::clear(frame, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use hivemap_core::{DashboardConfig, FacilityType, FixtureSource};

    use super::*;

    const FIXTURE: &str = r#"[
        {"id":"power-1","name":"Brokdorf","type":"power","status":"critical","country":"DE","position":[53.86,9.34]},
        {"id":"base-1","name":"Ramstein","type":"base","status":"active","country":"DE","position":[49.43,7.6]},
        {"id":"port-1","name":"Rotterdam","type":"port","status":"active","country":"NL","position":[51.95,4.14]}
    ]"#;

    async fn loaded_app() -> (App, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();
        let dashboard = Dashboard::new(DashboardConfig {
            source: FixtureSource::Local(file.path().to_path_buf()),
            ..DashboardConfig::default()
        });
        let report = dashboard.load().await.unwrap();
        let mut app = App::new(dashboard.clone());
        app.process_action(&Action::FacilitiesLoaded {
            facilities: dashboard.facilities(),
            report,
        })
        .unwrap();
        (app, file)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    /// Feed `key` through the app and process everything it queues.
    fn press(app: &mut App, code: KeyCode) {
        if let Some(action) = app.handle_key_event(key(code)).unwrap() {
            app.process_action(&action).unwrap();
        }
        while let Ok(action) = app.action_rx.try_recv() {
            app.process_action(&action).unwrap();
        }
    }

    #[tokio::test]
    async fn typing_a_search_filters_immediately() {
        let (mut app, _file) = loaded_app().await;
        press(&mut app, KeyCode::Char('/'));
        assert!(app.search_active);
        for c in "rott".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.dashboard.ui().criteria().search, "rott");
        assert_eq!(app.dashboard.visible().len(), 1);

        press(&mut app, KeyCode::Esc);
        assert!(!app.search_active);
        assert_eq!(app.dashboard.ui().criteria().search, "");
    }

    #[tokio::test]
    async fn layer_keys_flip_the_shared_state() {
        let (mut app, _file) = loaded_app().await;
        let before = app.dashboard.ui().show_heatmap();
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.dashboard.ui().show_heatmap(), !before);

        for _ in 0..20 {
            press(&mut app, KeyCode::Char('+'));
        }
        assert!((app.dashboard.ui().overlay_opacity() - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn filter_panel_captures_keys_until_closed() {
        let (mut app, _file) = loaded_app().await;
        press(&mut app, KeyCode::Char('f'));
        assert!(app.filter_panel_visible);

        // First entry is the power plant type.
        press(&mut app, KeyCode::Char(' '));
        assert!(app.dashboard.ui().criteria().types.contains(&FacilityType::Power));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);

        press(&mut app, KeyCode::Esc);
        assert!(!app.filter_panel_visible);
        press(&mut app, KeyCode::Char('R'));
        assert!(app.dashboard.ui().criteria().types.contains(&FacilityType::Power));
    }

    #[tokio::test]
    async fn terminal_opens_and_emergency_goes_through_confirmation() {
        let (mut app, _file) = loaded_app().await;
        app.process_action(&Action::OpenTerminal("power-1".into()))
            .unwrap();
        assert!(app.terminal.is_some());
        assert_eq!(app.dashboard.ui().selected(), None);
        while let Ok(action) = app.action_rx.try_recv() {
            app.process_action(&action).unwrap();
        }
        assert_eq!(app.dashboard.ui().selected(), Some("power-1".into()));

        press(&mut app, KeyCode::Char('e'));
        assert!(matches!(
            app.pending_confirm,
            Some(ConfirmAction::EmergencyShutdown { .. })
        ));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.pending_confirm.is_none());
        assert!(matches!(
            app.notification,
            Some((Notification { level: NotificationLevel::Error, .. }, _))
        ));

        press(&mut app, KeyCode::Esc);
        assert!(app.terminal.is_none());
    }

    #[tokio::test]
    async fn unknown_terminal_reports_an_error() {
        let (mut app, _file) = loaded_app().await;
        press(&mut app, KeyCode::Char('2'));
        app.process_action(&Action::OpenTerminal("nope-9".into()))
            .unwrap();
        while let Ok(action) = app.action_rx.try_recv() {
            app.process_action(&action).unwrap();
        }
        assert!(app.terminal.is_none());
        assert!(matches!(
            app.notification,
            Some((Notification { level: NotificationLevel::Error, .. }, _))
        ));
    }

    #[tokio::test]
    async fn confirmed_overwrite_writes_the_export() {
        let (app, _file) = loaded_app().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let action = App::confirmed(ConfirmAction::OverwriteExport { path: path.clone() });
        assert!(matches!(action, Action::WriteExport(ref p) if *p == path));

        let mut app = app;
        app.process_action(&action).unwrap();
        let notify = app.action_rx.recv().await.unwrap();
        assert!(matches!(
            notify,
            Action::Notify(Notification { level: NotificationLevel::Success, .. })
        ));
        let csv = std::fs::read_to_string(&path).unwrap();
        assert!(csv.starts_with("id,name,type,status,country"));
        assert_eq!(csv.lines().count(), 4);
    }
}
