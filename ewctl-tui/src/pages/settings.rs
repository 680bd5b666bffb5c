//! 设置视图

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::backend::{AppConfig, UiConfig};
use crate::message::{Command, Message, NavigationMessage, Ticket};
use crate::model::state::{ListCursor, SettingItem};
use crate::model::ViewId;
use crate::pages::{emit, SubView};
use crate::view::components::panel;
use crate::view::theme::{colors, Styles};

const ORIGIN: ViewId = ViewId::Settings;

/// 只读区标签列宽
const FIELD_WIDTH: usize = 16;
/// 界面选项标签列宽
const LABEL_WIDTH: usize = 30;
/// `◀ ▶` 之间的取值宽度
const VALUE_WIDTH: usize = 7;

/// 按显示宽度右侧补空格
fn pad_right(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// 按显示宽度居中
fn center(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    let left = fill / 2;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(fill - left))
}

/// 保存结果
#[derive(Debug, Clone, PartialEq, Eq)]
enum SaveStatus {
    Saved(String),
    Failed(String),
}

/// 设置
///
/// `stored` 是磁盘上的配置，保存时只替换其中的界面设置，
/// 环境变量和密钥链带来的覆盖值不会被写回文件。
/// `display` 是已遮蔽密钥的生效配置，只用于展示。
#[derive(Debug)]
pub struct SettingsView {
    stored: AppConfig,
    display: AppConfig,
    ui: UiConfig,
    cursor: ListCursor,
    saving: Option<Ticket>,
    status: Option<SaveStatus>,
    tick: usize,
}

impl SettingsView {
    pub fn new(stored: AppConfig, effective: &AppConfig) -> Self {
        Self {
            ui: effective.ui,
            display: effective.masked(),
            stored,
            cursor: ListCursor::default(),
            saving: None,
            status: None,
            tick: 0,
        }
    }

    pub fn ui(&self) -> UiConfig {
        self.ui
    }

    pub fn selected(&self) -> Option<SettingItem> {
        SettingItem::from_index(self.cursor.selected)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|s| match s {
            SaveStatus::Saved(msg) | SaveStatus::Failed(msg) => msg.as_str(),
        })
    }

    /// 切换当前项，返回广播新偏好的命令
    fn toggle(&mut self) -> Vec<Command> {
        let Some(item) = self.selected() else {
            return Vec::new();
        };
        match item {
            SettingItem::Theme => self.ui.theme = self.ui.theme.next(),
            SettingItem::Mouse => self.ui.mouse = !self.ui.mouse,
            SettingItem::Animations => self.ui.animations = !self.ui.animations,
            SettingItem::ConfirmDestructive => {
                self.ui.confirm_destructive = !self.ui.confirm_destructive;
            }
        }
        self.status = None;
        log::debug!("setting {} changed", item.label());
        vec![Command::Emit(Message::Preferences(self.ui))]
    }

    fn save(&mut self) -> Vec<Command> {
        let mut config = self.stored.clone();
        config.ui = self.ui;
        let ticket = Ticket::issue(ORIGIN);
        self.saving = Some(ticket);
        self.status = None;
        vec![Command::SaveConfig {
            ticket,
            config: Box::new(config),
        }]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if self.saving.is_some() {
            return Vec::new();
        }
        let len = SettingItem::all().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.select_next(len),
            KeyCode::Enter | KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                return self.toggle();
            }
            KeyCode::Char('s') => return self.save(),
            KeyCode::Char('q') => return vec![emit(NavigationMessage::Home)],
            _ => {}
        }
        Vec::new()
    }

    fn value_text(&self, item: SettingItem) -> &'static str {
        let on_off = |b: bool| if b { "On" } else { "Off" };
        match item {
            SettingItem::Theme => self.ui.theme.name(),
            SettingItem::Mouse => on_off(self.ui.mouse),
            SettingItem::Animations => on_off(self.ui.animations),
            SettingItem::ConfirmDestructive => on_off(self.ui.confirm_destructive),
        }
    }

    fn section(title: &'static str, rows: &[(&'static str, &str)]) -> Vec<Line<'static>> {
        let mut lines = vec![Line::styled(format!("  {title}"), Styles::title())];
        for (label, value) in rows {
            let value = if value.is_empty() { "(not set)" } else { *value };
            lines.push(Line::from(vec![
                Span::styled(format!("    {}", pad_right(label, FIELD_WIDTH)), Styles::muted()),
                Span::raw(value.to_string()),
            ]));
        }
        lines.push(Line::from(""));
        lines
    }

    fn render_readonly(&self, frame: &mut Frame, area: Rect) {
        let cf = &self.display.cloudflare;
        let zapi = &self.display.zapi;
        let mut lines = Self::section(
            "Cloudflare",
            &[
                ("Account ID", cf.account_id.as_str()),
                ("Database ID", cf.database_id.as_str()),
                ("API Token", cf.api_token.as_str()),
                ("Worker URL", cf.worker_url.as_str()),
            ],
        );
        lines.extend(Self::section(
            "Z-API",
            &[
                ("Instance ID", zapi.instance_id.as_str()),
                ("Instance Token", zapi.instance_token.as_str()),
                ("Client Token", zapi.client_token.as_str()),
            ],
        ));
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_items(&self, frame: &mut Frame, area: Rect) {
        let c = colors();
        let items: Vec<ListItem> = SettingItem::all()
            .iter()
            .map(|item| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("  {}", pad_right(item.label(), LABEL_WIDTH)),
                        Style::default().fg(c.fg),
                    ),
                    Span::styled(
                        format!("◀ {} ▶", center(self.value_text(*item), VALUE_WIDTH)),
                        Styles::hint_key(),
                    ),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Styles::border())
                    .title(" Interface "),
            )
            .highlight_style(Styles::selected());
        let mut state = ListState::default();
        state.select(Some(self.cursor.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn status_line(&self) -> Option<Line<'static>> {
        if self.saving.is_some() {
            return Some(Line::from(vec![
                Span::raw("  "),
                Span::raw(panel::spinner(self.tick)),
                Span::styled(" Saving...", Styles::muted()),
            ]));
        }
        self.status.as_ref().map(|s| match s {
            SaveStatus::Saved(msg) => Line::styled(format!("  ✓ {msg}"), Styles::success()),
            SaveStatus::Failed(msg) => Line::styled(format!("  ✗ {msg}"), Styles::error()),
        })
    }
}

impl SubView for SettingsView {
    fn handle(&mut self, msg: Message) -> Vec<Command> {
        match msg {
            Message::Tick => self.tick = self.tick.wrapping_add(1),
            Message::ConfigSaved { ticket, result } => {
                if self.saving != Some(ticket) {
                    log::debug!("dropping stale save result #{}", ticket.id);
                    return Vec::new();
                }
                self.saving = None;
                self.status = Some(match result {
                    Ok(path) => {
                        self.stored.ui = self.ui;
                        SaveStatus::Saved(format!("Saved to {}", path.display()))
                    }
                    Err(e) => SaveStatus::Failed(e.to_string()),
                });
            }
            Message::Key(key) => return self.handle_key(&key),
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(11),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(area);
        self.render_readonly(frame, rows[0]);
        self.render_items(frame, rows[1]);
        if let Some(line) = self.status_line() {
            frame.render_widget(Paragraph::new(line), rows[2]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::view::theme::Theme;
    use crossterm::event::KeyModifiers;
    use std::path::PathBuf;

    fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn view() -> SettingsView {
        let mut effective = AppConfig::default();
        effective.cloudflare.api_token = "secret-token-value".into();
        SettingsView::new(AppConfig::default(), &effective)
    }

    #[test]
    fn secrets_are_masked_for_display() {
        let view = view();
        assert_ne!(view.display.cloudflare.api_token, "secret-token-value");
        assert!(view.display.cloudflare.api_token.contains("****"));
    }

    #[test]
    fn toggling_broadcasts_preferences() {
        let mut view = view();
        let cmds = view.handle(key(KeyCode::Enter));
        let expected = UiConfig {
            theme: Theme::Light,
            ..UiConfig::default()
        };
        assert_eq!(cmds, vec![Command::Emit(Message::Preferences(expected))]);

        view.handle(key(KeyCode::Down));
        view.handle(key(KeyCode::Down));
        view.handle(key(KeyCode::Down));
        view.handle(key(KeyCode::Right));
        assert!(!view.ui().confirm_destructive);
    }

    #[test]
    fn save_writes_stored_config_with_new_ui() {
        let mut view = view();
        view.handle(key(KeyCode::Enter));
        let cmds = view.handle(key(KeyCode::Char('s')));
        let [Command::SaveConfig { ticket, config }] = cmds.as_slice() else {
            panic!("expected save, got {cmds:?}");
        };
        // 生效配置中的令牌不写回文件
        assert_eq!(config.cloudflare.api_token, "");
        assert_eq!(config.ui.theme, Theme::Light);
        assert!(view.handle(key(KeyCode::Char('s'))).is_empty());

        view.handle(Message::ConfigSaved {
            ticket: *ticket,
            result: Ok(PathBuf::from("/tmp/ewctl/config.yaml")),
        });
        assert_eq!(view.status(), Some("Saved to /tmp/ewctl/config.yaml"));
    }

    #[test]
    fn save_failure_is_reported() {
        let mut view = view();
        let cmds = view.handle(key(KeyCode::Char('s')));
        view.handle(Message::ConfigSaved {
            ticket: cmds[0].ticket().unwrap(),
            result: Err(AppError::NotInitialized("config service")),
        });
        assert_eq!(view.status(), Some("config service is not initialized"));
        assert!(!view.is_saving());
    }

    #[test]
    fn q_returns_home() {
        let mut view = view();
        assert_eq!(
            view.handle(key(KeyCode::Char('q'))),
            vec![emit(NavigationMessage::Home)]
        );
    }

    #[test]
    fn padding_uses_display_width() {
        assert_eq!(pad_right("ID", 4), "ID  ");
        assert_eq!(pad_right("名称", 6), "名称  ");
        assert_eq!(center("on", VALUE_WIDTH), "  on   ");
        assert_eq!(center("too long value", 4), "too long value");
    }
}
