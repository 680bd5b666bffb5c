//! 表单列表

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ewctl_store::FormSummary;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::error::AppError;
use crate::message::{
    Command, EntityId, LoadedData, Message, NavPayload, NavigationMessage, Ticket,
};
use crate::model::state::{render_mode, ListCursor, Loadable, Phase, RenderMode};
use crate::model::ViewId;
use crate::pages::{emit, expect_data, SubView};
use crate::view::components::panel;
use crate::view::theme::{colors, Styles};

const ORIGIN: ViewId = ViewId::FormsList;

/// 表单列表
#[derive(Debug)]
pub struct FormsListView {
    forms: Loadable<Vec<FormSummary>>,
    cursor: ListCursor,
    /// 等待 y/n 确认删除的表单
    confirm_delete: Option<String>,
    deleting: Option<Ticket>,
    confirm_destructive: bool,
    notice: Option<String>,
    height: u16,
    tick: usize,
}

impl Default for FormsListView {
    fn default() -> Self {
        Self {
            forms: Loadable::new(),
            cursor: ListCursor::default(),
            confirm_delete: None,
            deleting: None,
            confirm_destructive: true,
            notice: None,
            height: 0,
            tick: 0,
        }
    }
}

impl FormsListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forms(&self) -> &Loadable<Vec<FormSummary>> {
        &self.forms
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.confirm_delete.as_deref()
    }

    /// 强制刷新，不论当前状态
    pub fn force_reload(&mut self) -> Command {
        Command::LoadForms {
            ticket: self.forms.force(ORIGIN),
        }
    }

    fn items(&self) -> &[FormSummary] {
        self.forms.data().map_or(&[], Vec::as_slice)
    }

    fn selected(&self) -> Option<&FormSummary> {
        self.items().get(self.cursor.selected)
    }

    /// 表格可见行数
    fn page_size(&self) -> usize {
        usize::from(self.height.saturating_sub(10)).max(1)
    }

    fn delete(&mut self, id: String) -> Vec<Command> {
        let ticket = Ticket::issue(ORIGIN);
        self.deleting = Some(ticket);
        vec![Command::DeleteForm { ticket, id }]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if self.forms.is_loading() || self.deleting.is_some() {
            return Vec::new();
        }

        if let Some(id) = self.confirm_delete.take() {
            if matches!(key.code, KeyCode::Char('y' | 'Y')) {
                return self.delete(id);
            }
            return Vec::new();
        }

        self.notice = None;

        if self.forms.error().is_some() {
            if key.code == KeyCode::Char('r') {
                return self.retry();
            }
            return Vec::new();
        }

        let len = self.items().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.select_next(len),
            KeyCode::Home | KeyCode::Char('g') => self.cursor.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.cursor.select_last(len),
            KeyCode::PageUp => self.cursor.page_up(self.page_size()),
            KeyCode::PageDown => self.cursor.page_down(len, self.page_size()),
            KeyCode::Char('r') => return self.retry(),
            KeyCode::Char('n') => return vec![emit(NavigationMessage::to(ViewId::FormCreate))],
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(form) = self.selected() {
                    return vec![emit(NavigationMessage::Navigate {
                        view: ViewId::FormEdit,
                        title: Some(format!("Edit Form: {}", form.name)),
                        payload: Some(NavPayload::FormId(form.id.clone())),
                    })];
                }
            }
            KeyCode::Char('t') => {
                if let Some(form) = self.selected() {
                    return vec![emit(NavigationMessage::with_payload(
                        ViewId::WebhookTest,
                        NavPayload::FormId(form.id.clone()),
                    ))];
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected().map(|f| f.id.clone()) {
                    if self.confirm_destructive {
                        self.confirm_delete = Some(id);
                    } else {
                        return self.delete(id);
                    }
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn retry(&mut self) -> Vec<Command> {
        self.forms
            .retry(ORIGIN)
            .map(|ticket| Command::LoadForms { ticket })
            .into_iter()
            .collect()
    }

    fn on_deleted(&mut self, ticket: Ticket, result: Result<EntityId, AppError>) -> Vec<Command> {
        if self.deleting != Some(ticket) {
            return Vec::new();
        }
        self.deleting = None;
        match result {
            Ok(id) => {
                self.notice = Some(format!("Deleted form {id}"));
                vec![self.force_reload()]
            }
            Err(e) => {
                self.notice = Some(e.to_string());
                Vec::new()
            }
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let c = colors();
        let forms = self.items();
        if forms.is_empty() {
            let lines = vec![
                Line::from(""),
                Line::styled("  No forms yet.", Styles::muted()),
                Line::from(""),
                Line::styled("  n: Create your first form", Styles::muted()),
            ];
            frame.render_widget(Paragraph::new(lines), area);
            return;
        }

        let header = Row::new(["ID", "Name", "Fields", "Recipients", "Created"])
            .style(Styles::title())
            .bottom_margin(1);
        let rows: Vec<Row> = forms
            .iter()
            .map(|f| {
                let created = f
                    .created_at
                    .map_or_else(String::new, |t| t.with_timezone(&Local).format("%Y-%m-%d").to_string());
                Row::new([
                    Cell::from(f.id.clone()),
                    Cell::from(f.name.clone()),
                    Cell::from(f.field_count.to_string()),
                    Cell::from(f.number_count.to_string()),
                    Cell::from(created),
                ])
                .style(Style::default().fg(c.fg))
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(20),
                Constraint::Min(20),
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .row_highlight_style(Styles::selected());

        let mut state = TableState::default();
        state.select(Some(self.cursor.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn summary_line(&self) -> Line<'static> {
        let forms = self.items();
        let fields: i64 = forms.iter().map(|f| f.field_count).sum();
        let numbers: i64 = forms.iter().map(|f| f.number_count).sum();
        Line::styled(
            format!(
                "  {} forms • {fields} total fields • {numbers} recipients",
                forms.len()
            ),
            Styles::muted(),
        )
    }
}

impl SubView for FormsListView {
    fn handle(&mut self, msg: Message) -> Vec<Command> {
        match msg {
            // 已加载或失败的列表只在刷新键或强制刷新时重新加载
            Message::Activated(_) if self.forms.phase() == Phase::Idle => {
                return self
                    .forms
                    .start(ORIGIN)
                    .map(|ticket| Command::LoadForms { ticket })
                    .into_iter()
                    .collect();
            }
            Message::Resize { height, .. } => self.height = height,
            Message::Tick => self.tick = self.tick.wrapping_add(1),
            Message::Preferences(ui) => self.confirm_destructive = ui.confirm_destructive,
            Message::Loaded { ticket, result } => {
                let result = expect_data(result, |d| match d {
                    LoadedData::Forms(forms) => Some(forms),
                    _ => None,
                });
                if self.forms.resolve(ticket, result) {
                    self.cursor.clamp(self.items().len());
                }
            }
            Message::Deleted { ticket, result } => return self.on_deleted(ticket, result),
            Message::Key(key) => return self.handle_key(&key),
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        match render_mode(self.forms.error().is_some(), self.forms.is_loading(), false) {
            RenderMode::Error => {
                if let Some(e) = self.forms.error() {
                    let hint = if e.is_retryable() {
                        "Press 'r' to retry"
                    } else {
                        "Press Esc to go back"
                    };
                    panel::render_error(frame, area, e, hint);
                }
            }
            RenderMode::Loading => panel::render_loading(frame, area, "Loading forms...", self.tick),
            RenderMode::Done | RenderMode::Normal => {
                let rows = Layout::vertical([
                    Constraint::Min(3),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .split(area);
                self.render_table(frame, rows[0]);
                frame.render_widget(Paragraph::new(self.summary_line()), rows[1]);

                let status = if self.deleting.is_some() {
                    Some(Line::from(vec![
                        Span::raw("  "),
                        Span::raw(panel::spinner(self.tick)),
                        Span::styled(" Deleting...", Styles::muted()),
                    ]))
                } else {
                    self.notice
                        .as_ref()
                        .map(|n| Line::styled(format!("  {n}"), Styles::warning()))
                };
                if let Some(status) = status {
                    frame.render_widget(Paragraph::new(status), rows[2]);
                }

                if let Some(id) = &self.confirm_delete {
                    panel::render_confirm(frame, area, &format!("Delete form '{id}'?"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> Message {
        Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn summary(id: &str) -> FormSummary {
        FormSummary {
            id: id.to_string(),
            name: id.to_uppercase(),
            ..FormSummary::default()
        }
    }

    fn ready(view: &mut FormsListView, forms: Vec<FormSummary>) {
        let cmds = view.handle(Message::Activated(None));
        let Some(ticket) = cmds.first().and_then(Command::ticket) else {
            panic!("expected a load command");
        };
        view.handle(Message::Loaded {
            ticket,
            result: Ok(LoadedData::Forms(forms)),
        });
    }

    #[test]
    fn nothing_loads_before_activation() {
        let mut view = FormsListView::new();
        assert!(view.init().is_empty());
        assert_eq!(view.handle(Message::Activated(None)).len(), 1);
        assert!(view.handle(Message::Activated(None)).is_empty());
    }

    #[test]
    fn activation_keeps_loaded_or_failed_list() {
        let mut view = FormsListView::new();
        ready(&mut view, vec![summary("a")]);
        assert!(view.handle(Message::Activated(None)).is_empty());
        assert_eq!(view.items().len(), 1);

        let mut failed = FormsListView::new();
        let cmds = failed.handle(Message::Activated(None));
        failed.handle(Message::Loaded {
            ticket: cmds[0].ticket().unwrap(),
            result: Err(AppError::LoadFailed("timeout".into())),
        });
        assert!(failed.handle(Message::Activated(None)).is_empty());
        assert_eq!(failed.handle(key('r')).len(), 1);
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let mut view = FormsListView::new();
        ready(&mut view, vec![summary("a"), summary("b")]);
        view.handle(key('j'));
        assert!(view.handle(key('d')).is_empty());
        assert_eq!(view.pending_delete(), Some("b"));

        let cmds = view.handle(key('y'));
        let [Command::DeleteForm { ticket, id }] = cmds.as_slice() else {
            panic!("expected delete, got {cmds:?}");
        };
        assert_eq!(id, "b");

        let cmds = view.handle(Message::Deleted {
            ticket: *ticket,
            result: Ok(EntityId::Form("b".into())),
        });
        assert!(matches!(cmds.as_slice(), [Command::LoadForms { .. }]));
    }

    #[test]
    fn declining_confirmation_cancels() {
        let mut view = FormsListView::new();
        ready(&mut view, vec![summary("a")]);
        view.handle(key('d'));
        assert!(view.handle(key('n')).is_empty());
        assert_eq!(view.pending_delete(), None);
    }

    #[test]
    fn retry_only_after_failure_is_retryable() {
        let mut view = FormsListView::new();
        let cmds = view.handle(Message::Activated(None));
        let ticket = cmds[0].ticket().unwrap();
        view.handle(Message::Loaded {
            ticket,
            result: Err(AppError::NotInitialized("form repository")),
        });
        assert!(view.handle(key('r')).is_empty());
    }

    #[test]
    fn test_key_targets_selected_form() {
        let mut view = FormsListView::new();
        ready(&mut view, vec![summary("contact-us")]);
        assert_eq!(
            view.handle(key('t')),
            vec![emit(NavigationMessage::with_payload(
                ViewId::WebhookTest,
                NavPayload::FormId("contact-us".into())
            ))]
        );
    }
}
