//! Terminal overlay: the control panel of one facility.
//!
//! Owns the [`TerminalSession`] and the sending half of the feed bridge.
//! Dropping the view cancels the bridge, which shuts the feed down.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use hivemap_core::terminal::{ButtonAction, Widget, gauge_level, gauge_ratio};
use hivemap_core::{FeedCommand, Readings, TerminalSession};

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::{popup, readout, sub_tabs};

const LABEL_WIDTH: usize = 22;
const BAR_WIDTH: usize = 20;
/// Slider steps across its full range.
const SLIDER_STEPS: f64 = 20.0;

pub struct TerminalView {
    session: TerminalSession,
    readings: Readings,
    commands: mpsc::UnboundedSender<FeedCommand>,
    cancel: CancellationToken,
    focused_button: usize,
}

impl TerminalView {
    pub fn new(
        session: TerminalSession,
        commands: mpsc::UnboundedSender<FeedCommand>,
        cancel: CancellationToken,
    ) -> Self {
        let readings = session.telemetry().readings().clone();
        Self {
            session,
            readings,
            commands,
            cancel,
            focused_button: 0,
        }
    }

    fn send(&self, commands: Vec<FeedCommand>) {
        for command in commands {
            if self.commands.send(command).is_err() {
                debug!(facility = %self.session.facility(), "feed bridge gone");
                break;
            }
        }
    }

    fn buttons(&self) -> impl Iterator<Item = (&'static str, ButtonAction, bool)> + '_ {
        self.session.tab().widgets.iter().filter_map(|w| match *w {
            Widget::Button {
                label,
                action,
                confirm,
            } => Some((label, action, confirm)),
            _ => None,
        })
    }

    fn slider_step(&self) -> Option<f64> {
        self.session.tab().widgets.iter().find_map(|w| match *w {
            Widget::Slider { min, max, .. } => Some((max - min) / SLIDER_STEPS),
            _ => None,
        })
    }

    fn emergency_prompt(&self) -> Option<Action> {
        (!self.session.is_emergency()).then(|| {
            Action::ShowConfirm(ConfirmAction::EmergencyShutdown {
                title: self.session.title().to_owned(),
            })
        })
    }

    fn press_focused(&mut self) -> Option<Action> {
        let (label, action, confirm) = self.buttons().nth(self.focused_button)?;
        match action {
            ButtonAction::EmergencyShutdown => self.emergency_prompt(),
            _ if confirm => Some(Action::ShowConfirm(ConfirmAction::PressButton { label, action })),
            _ => self.run_button(action),
        }
    }

    fn run_button(&mut self, action: ButtonAction) -> Option<Action> {
        let commands = self.session.press(action);
        self.send(commands);
        match action {
            ButtonAction::EmergencyShutdown => Some(Action::Notify(Notification::error(format!(
                "Emergency shutdown: {}",
                self.session.title()
            )))),
            ButtonAction::Log(message) => Some(Action::Notify(Notification::info(message))),
        }
    }

    fn switch_tab(&mut self, forward: bool) {
        if forward {
            self.session.next_tab();
        } else {
            self.session.prev_tab();
        }
        self.focused_button = 0;
    }

    fn widget_line(&self, widget: &Widget, toggle_no: &mut usize, button_no: &mut usize) -> Line<'static> {
        let label = |text: &str| {
            Span::styled(
                format!("  {text:<LABEL_WIDTH$}"),
                Style::default().fg(theme::DIM_WHITE),
            )
        };
        let missing = || Span::styled("─", Style::default().fg(theme::BORDER_GRAY));

        match *widget {
            Widget::Gauge {
                label: text,
                signal,
                unit,
                min,
                max,
                zones,
            } => match self.readings.get(signal) {
                Some(v) => {
                    let color = theme::level_color(gauge_level(zones, v));
                    Line::from(vec![
                        label(text),
                        Span::styled(
                            readout::bar(gauge_ratio(min, max, v), BAR_WIDTH),
                            Style::default().fg(color),
                        ),
                        Span::styled(
                            format!(" {}", readout::value(v, 1, unit)),
                            Style::default().fg(color),
                        ),
                    ])
                }
                None => Line::from(vec![label(text), missing()]),
            },
            Widget::Display {
                label: text,
                signal,
                unit,
                decimals,
                alarm_above,
            } => match self.readings.get(signal) {
                Some(v) => {
                    let alarmed = alarm_above.is_some_and(|limit| v > limit);
                    let style = if alarmed {
                        Style::default()
                            .fg(theme::ERROR_RED)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(theme::NEON_CYAN)
                    };
                    Line::from(vec![
                        label(text),
                        Span::styled(readout::value(v, decimals, unit), style),
                    ])
                }
                None => Line::from(vec![label(text), missing()]),
            },
            Widget::Toggle { key, label: text, .. } => {
                *toggle_no += 1;
                let on = self.session.toggle_state(key).unwrap_or(false);
                let (word, color) = if on {
                    ("ON", theme::SUCCESS_GREEN)
                } else {
                    ("OFF", theme::ERROR_RED)
                };
                Line::from(vec![
                    Span::styled(format!("  [{toggle_no}] "), theme::key_hint_key()),
                    Span::styled(
                        format!("{text:<w$}", w = LABEL_WIDTH - 4),
                        Style::default().fg(theme::DIM_WHITE),
                    ),
                    Span::styled(word, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                ])
            }
            Widget::Led { label: text, rule } => Line::from(vec![
                label(text),
                readout::led(self.session.led_color(&rule, &self.readings)),
            ]),
            Widget::Slider {
                signal,
                label: text,
                min,
                max,
                unit,
            } => match self.session.setpoint(signal) {
                Some(v) => Line::from(vec![
                    label(text),
                    Span::styled(
                        readout::bar(gauge_ratio(min, max, v), BAR_WIDTH),
                        Style::default().fg(theme::ELECTRIC_PURPLE),
                    ),
                    Span::styled(
                        format!(" {}", readout::value(v, 0, unit)),
                        Style::default().fg(theme::ELECTRIC_PURPLE),
                    ),
                    Span::styled("  [ ]", theme::key_hint()),
                ]),
                None => Line::from(vec![label(text), missing()]),
            },
            Widget::Button { label: text, action, .. } => {
                let focused = *button_no == self.focused_button;
                *button_no += 1;
                let color = match action {
                    ButtonAction::EmergencyShutdown => theme::ERROR_RED,
                    ButtonAction::Log(_) => theme::LIGHT_BLUE,
                };
                let mut style = Style::default().fg(color);
                if focused {
                    style = style.bg(theme::BG_HIGHLIGHT).add_modifier(Modifier::BOLD);
                }
                let locked = self.session.is_emergency() && action == ButtonAction::EmergencyShutdown;
                let marker = if focused { "▸ " } else { "  " };
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(format!("[ {text} ]"), style),
                    Span::styled(if locked { "  engaged" } else { "" }, theme::key_hint()),
                ])
            }
        }
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let mut toggle_no = 0;
        let mut button_no = 0;
        let lines: Vec<Line> = self
            .session
            .tab()
            .widgets
            .iter()
            .map(|w| self.widget_line(w, &mut toggle_no, &mut button_no))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_audit(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Audit log ")
            .title_style(theme::title_style())
            .borders(Borders::TOP)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = self
            .session
            .audit()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        format!("  {}  ", entry.at.format("%H:%M:%S")),
                        theme::key_hint(),
                    ),
                    Span::styled(entry.message.clone(), Style::default().fg(theme::DIM_WHITE)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Component for TerminalView {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Esc => Some(Action::CloseTerminal),
            KeyCode::Tab => {
                self.switch_tab(true);
                None
            }
            KeyCode::BackTab => {
                self.switch_tab(false);
                None
            }
            KeyCode::Char(c @ '1'..='9') => {
                let n = c
                    .to_digit(10)
                    .and_then(|d| usize::try_from(d).ok())
                    .map_or(0, |d| d - 1);
                match self.session.toggle_nth(n) {
                    Ok(_) => None,
                    Err(e) => Some(Action::Notify(Notification::warning(e.to_string()))),
                }
            }
            KeyCode::Char('[') => {
                if let Some(step) = self.slider_step() {
                    self.session.nudge_slider(-step);
                }
                None
            }
            KeyCode::Char(']') => {
                if let Some(step) = self.slider_step() {
                    self.session.nudge_slider(step);
                }
                None
            }
            KeyCode::Char('a') => {
                if self.session.has_changes() {
                    let commands = self.session.apply();
                    self.send(commands);
                    Some(Action::Notify(Notification::success("Changes applied")))
                } else {
                    Some(Action::Notify(Notification::info("No staged changes")))
                }
            }
            KeyCode::Char('u') => {
                self.session.revert();
                None
            }
            KeyCode::Char('e') => self.emergency_prompt(),
            KeyCode::Left => {
                self.focused_button = self.focused_button.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                let count = self.buttons().count();
                if self.focused_button + 1 < count {
                    self.focused_button += 1;
                }
                None
            }
            KeyCode::Enter => self.press_focused(),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ReadingsUpdated { facility, readings } if facility == self.session.facility() => {
                self.readings.clone_from(readings);
                Ok(None)
            }
            Action::TerminalButton(button) => Ok(self.run_button(*button)),
            _ => Ok(None),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let panel = popup::centered(
            area,
            area.width.saturating_sub(6).min(96),
            area.height.saturating_sub(2).min(34),
        );
        popup::clear(frame, panel);

        let border = if self.session.is_emergency() {
            Style::default().fg(theme::ERROR_RED)
        } else {
            theme::border_focused()
        };
        let block = Block::default()
            .title(format!(" {} ", self.session.title()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let [status_area, tabs_area, body_area, audit_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .areas(inner);

        let status = if self.session.is_emergency() {
            Line::from(Span::styled(
                "  EMERGENCY SHUTDOWN ACTIVE · controls locked",
                theme::alert_banner(),
            ))
        } else if self.session.has_changes() {
            Line::from(Span::styled(
                "  ● unsaved changes",
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ))
        } else {
            Line::from(Span::styled("  ● in sync", Style::default().fg(theme::SUCCESS_GREEN)))
        };
        frame.render_widget(Paragraph::new(status), status_area);

        let titles: Vec<&str> = self.session.schema().tabs.iter().map(|t| t.title).collect();
        frame.render_widget(
            Paragraph::new(sub_tabs::render_sub_tabs(&titles, self.session.active_tab())),
            tabs_area,
        );

        self.render_body(frame, body_area);
        self.render_audit(frame, audit_area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Tab ", theme::key_hint_key()),
                Span::styled("tabs  ", theme::key_hint()),
                Span::styled("1-9 ", theme::key_hint_key()),
                Span::styled("toggle  ", theme::key_hint()),
                Span::styled("[ ] ", theme::key_hint_key()),
                Span::styled("slider  ", theme::key_hint()),
                Span::styled("a ", theme::key_hint_key()),
                Span::styled("apply  ", theme::key_hint()),
                Span::styled("u ", theme::key_hint_key()),
                Span::styled("revert  ", theme::key_hint()),
                Span::styled("←→ Enter ", theme::key_hint_key()),
                Span::styled("buttons  ", theme::key_hint()),
                Span::styled("e ", theme::key_hint_key()),
                Span::styled("emergency  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("close", theme::key_hint()),
            ])),
            hints_area,
        );
    }

    fn id(&self) -> &'static str {
        "Terminal"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{facility, render_to_string};

    fn view() -> (TerminalView, mpsc::UnboundedReceiver<FeedCommand>, CancellationToken) {
        let f = facility("power-1", "Brokdorf", "power", "critical", "DE", 53.86, 9.34);
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        (
            TerminalView::new(TerminalSession::open(&f), tx, cancel.clone()),
            rx,
            cancel,
        )
    }

    fn press(view: &mut TerminalView, code: KeyCode) -> Option<Action> {
        view.handle_key_event(KeyEvent::from(code)).unwrap()
    }

    #[test]
    fn slider_changes_are_sent_on_apply() {
        let (mut view, mut rx, _cancel) = view();
        press(&mut view, KeyCode::Char(']'));
        assert_eq!(view.session.setpoint("controlRods"), Some(70.0));
        assert!(rx.try_recv().is_err());

        let applied = press(&mut view, KeyCode::Char('a'));
        assert!(matches!(applied, Some(Action::Notify(_))));
        assert_eq!(
            rx.try_recv().unwrap(),
            FeedCommand::Set {
                key: "controlRods".into(),
                value: 70.0
            }
        );
    }

    #[test]
    fn digits_flip_toggles_on_the_active_tab() {
        let (mut view, _rx, _cancel) = view();
        press(&mut view, KeyCode::Tab);
        press(&mut view, KeyCode::Tab);
        assert_eq!(view.session.tab().title, "Grid");

        press(&mut view, KeyCode::Char('1'));
        assert_eq!(view.session.toggle_state("mainBreaker"), Some(false));
        let missing = press(&mut view, KeyCode::Char('9'));
        assert!(matches!(missing, Some(Action::Notify(_))));

        press(&mut view, KeyCode::Char('u'));
        assert_eq!(view.session.toggle_state("mainBreaker"), Some(true));
    }

    #[test]
    fn emergency_needs_confirmation_and_locks_controls() {
        let (mut view, mut rx, _cancel) = view();
        let prompt = press(&mut view, KeyCode::Char('e'));
        assert!(matches!(
            prompt,
            Some(Action::ShowConfirm(ConfirmAction::EmergencyShutdown { .. }))
        ));
        assert!(!view.session.is_emergency());

        view.update(&Action::TerminalButton(ButtonAction::EmergencyShutdown))
            .unwrap();
        assert!(view.session.is_emergency());
        let sent: Vec<FeedCommand> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(sent.last(), Some(&FeedCommand::Freeze(true)));

        assert!(press(&mut view, KeyCode::Char('e')).is_none());
        let out = render_to_string(&view, 110, 40);
        assert!(out.contains("EMERGENCY SHUTDOWN ACTIVE"));
    }

    #[test]
    fn emergency_button_routes_through_the_prompt() {
        let (mut view, _rx, _cancel) = view();
        for _ in 0..3 {
            press(&mut view, KeyCode::Tab);
        }
        assert_eq!(view.session.tab().title, "Emergency");

        let diagnostics = press(&mut view, KeyCode::Enter);
        assert!(matches!(diagnostics, Some(Action::Notify(_))));
        assert_eq!(
            view.session.audit().next().map(|e| e.message.as_str()),
            Some("Diagnostics completed")
        );

        press(&mut view, KeyCode::Right);
        let prompt = press(&mut view, KeyCode::Enter);
        assert!(matches!(
            prompt,
            Some(Action::ShowConfirm(ConfirmAction::EmergencyShutdown { .. }))
        ));
    }

    #[test]
    fn ignores_readings_of_other_facilities() {
        let (mut view, _rx, _cancel) = view();
        let before = view.readings.clone();
        view.update(&Action::ReadingsUpdated {
            facility: "base-1".into(),
            readings: Readings::default(),
        })
        .unwrap();
        assert_eq!(view.readings, before);
    }

    #[test]
    fn dropping_cancels_the_feed_bridge() {
        let (view, _rx, cancel) = view();
        drop(view);
        assert!(cancel.is_cancelled());
    }
}
