//! 仪表盘

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ewctl_store::{ConnectionStatus, Stats};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{emit, expect_data, SubView};
use crate::message::{Command, LoadedData, Message, NavigationMessage};
use crate::model::state::{render_mode, ListCursor, Loadable, RenderMode};
use crate::model::ViewId;
use crate::view::components::panel;
use crate::view::theme::{colors, Styles};

/// 菜单项：目标视图与说明
const MENU: [(ViewId, &str); 4] = [
    (ViewId::FormsList, "Manage Elementor forms and recipients"),
    (ViewId::ContactsList, "Manage WhatsApp contacts"),
    (ViewId::WebhookTest, "Send a test submission to the worker"),
    (ViewId::Settings, "Configuration and preferences"),
];

const HELP_LINES: [(&str, &str); 7] = [
    ("1-5", "Jump to Dashboard / Forms / Contacts / Webhook / Settings"),
    ("↑↓ / jk", "Move in the menu"),
    ("Enter", "Open the selected item"),
    ("r", "Refresh statistics"),
    ("Esc", "Back to the dashboard from any screen"),
    ("Ctrl+C", "Quit from anywhere"),
    ("q", "Quit (dashboard only)"),
];

/// 仪表盘
#[derive(Debug, Default)]
pub struct DashboardView {
    stats: Loadable<Stats>,
    menu: ListCursor,
    show_help: bool,
    tick: usize,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &Loadable<Stats> {
        &self.stats
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn selected(&self) -> ViewId {
        MENU[self.menu.selected.min(MENU.len() - 1)].0
    }

    fn load(&mut self) -> Vec<Command> {
        self.stats
            .retry(ViewId::Dashboard)
            .map(|ticket| Command::LoadStats { ticket })
            .into_iter()
            .collect()
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if self.stats.is_loading() {
            return Vec::new();
        }
        if self.show_help {
            self.show_help = false;
            return Vec::new();
        }

        match key.code {
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => return self.load(),
            KeyCode::Up | KeyCode::Char('k') => self.menu.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.menu.select_next(MENU.len()),
            KeyCode::Enter => {
                return vec![emit(NavigationMessage::to(self.selected()))];
            }
            _ => {}
        }
        Vec::new()
    }

    fn render_stats(frame: &mut Frame, area: Rect, status_area: Rect, stats: &Stats) {
        let c = colors();
        let cards = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

        let last = stats
            .last_webhook
            .map_or_else(|| "Never".to_string(), |t| {
                t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
            });
        let connection_style = match stats.connection {
            ConnectionStatus::Connected => Styles::success(),
            ConnectionStatus::Disconnected => Styles::error(),
        };

        let items = [
            ("Forms", format!("{} ({} active)", stats.total_forms, stats.active_forms)),
            ("Contacts", stats.total_contacts.to_string()),
            ("Webhooks today", stats.webhooks_today.to_string()),
            ("Last webhook", last),
        ];

        for ((label, value), card) in items.into_iter().zip(cards.iter()) {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border())
                .title(Span::styled(format!(" {label} "), Styles::muted()));
            let paragraph = Paragraph::new(Line::styled(value, Style::default().fg(c.fg)))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, *card);
        }

        let status = Line::from(vec![
            Span::styled("  Database: ", Styles::muted()),
            Span::styled(stats.connection.to_string(), connection_style),
        ]);
        frame.render_widget(Paragraph::new(status), status_area);
    }

    fn render_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = MENU
            .iter()
            .enumerate()
            .map(|(i, (view, desc))| {
                let selected = i == self.menu.selected;
                let style = if selected {
                    Styles::selected()
                } else {
                    Style::default().fg(colors().fg)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("  {}  {:<14}", i + 2, view.title()), style),
                    Span::styled(format!("  {desc}"), Styles::muted()),
                ]))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .title(" Menu ");
        let mut state = ListState::default();
        state.select(Some(self.menu.selected));
        frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
    }

    fn render_help(frame: &mut Frame, area: Rect) {
        let popup = panel::centered_rect(64, 11, area);
        frame.render_widget(Clear, popup);

        let lines: Vec<Line> = HELP_LINES
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(format!(" {key:<8}"), Styles::hint_key()),
                    Span::raw(" "),
                    Span::raw(*desc),
                ])
            })
            .collect();

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Styles::border_focused());
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

impl SubView for DashboardView {
    fn init(&mut self) -> Vec<Command> {
        self.load()
    }

    fn handle(&mut self, msg: Message) -> Vec<Command> {
        match msg {
            Message::Tick => self.tick = self.tick.wrapping_add(1),
            Message::Loaded { ticket, result } => {
                let result = expect_data(result, |d| match d {
                    LoadedData::Stats(stats) => Some(stats),
                    _ => None,
                });
                self.stats.resolve(ticket, result);
            }
            Message::Key(key) => return self.handle_key(&key),
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let mode = render_mode(
            self.stats.error().is_some(),
            self.stats.is_loading(),
            false,
        );
        match mode {
            RenderMode::Error => {
                if let Some(e) = self.stats.error() {
                    let hint = if e.is_retryable() {
                        "Press 'r' to retry"
                    } else {
                        "Check your configuration and restart"
                    };
                    panel::render_error(frame, area, e, hint);
                }
            }
            RenderMode::Loading => {
                panel::render_loading(frame, area, "Loading dashboard...", self.tick);
            }
            RenderMode::Done | RenderMode::Normal => {
                let rows = Layout::vertical([
                    Constraint::Length(3),
                    Constraint::Length(2),
                    Constraint::Min(4),
                ])
                .split(area);
                let stats = self.stats.data().cloned().unwrap_or_default();
                Self::render_stats(frame, rows[0], rows[1], &stats);
                self.render_menu(frame, rows[2]);
            }
        }

        if self.show_help {
            Self::render_help(frame, area);
        }
    }
}
