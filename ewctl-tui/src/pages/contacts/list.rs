//! 联系人列表

use crossterm::event::{KeyCode, KeyEvent};
use ewctl_store::ContactSummary;
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

const ORIGIN: ViewId = ViewId::ContactsList;

/// 联系人列表
#[derive(Debug)]
pub struct ContactsListView {
    contacts: Loadable<Vec<ContactSummary>>,
    cursor: ListCursor,
    filter: String,
    filtering: bool,
    confirm_delete: Option<(i64, String)>,
    deleting: Option<Ticket>,
    confirm_destructive: bool,
    notice: Option<String>,
    height: u16,
    tick: usize,
}

impl Default for ContactsListView {
    fn default() -> Self {
        Self {
            contacts: Loadable::new(),
            cursor: ListCursor::default(),
            filter: String::new(),
            filtering: false,
            confirm_delete: None,
            deleting: None,
            confirm_destructive: true,
            notice: None,
            height: 0,
            tick: 0,
        }
    }
}

impl ContactsListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contacts(&self) -> &Loadable<Vec<ContactSummary>> {
        &self.contacts
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// 强制刷新，不论当前状态
    pub fn force_reload(&mut self) -> Command {
        Command::LoadContacts {
            ticket: self.contacts.force(ORIGIN),
        }
    }

    /// 经过过滤后的联系人
    pub fn visible(&self) -> Vec<&ContactSummary> {
        let all = self.contacts.data().map_or(&[][..], Vec::as_slice);
        if self.filter.is_empty() {
            return all.iter().collect();
        }
        let needle = self.filter.to_lowercase();
        all.iter()
            .filter(|s| {
                let c = &s.contact;
                c.name.to_lowercase().contains(&needle)
                    || c.company.to_lowercase().contains(&needle)
                    || c.phone_number.contains(&needle)
            })
            .collect()
    }

    fn selected(&self) -> Option<&ContactSummary> {
        self.visible().get(self.cursor.selected).copied()
    }

    fn page_size(&self) -> usize {
        usize::from(self.height.saturating_sub(10)).max(1)
    }

    fn retry(&mut self) -> Vec<Command> {
        self.contacts
            .retry(ORIGIN)
            .map(|ticket| Command::LoadContacts { ticket })
            .into_iter()
            .collect()
    }

    fn delete(&mut self, id: i64) -> Vec<Command> {
        let ticket = Ticket::issue(ORIGIN);
        self.deleting = Some(ticket);
        vec![Command::DeleteContact { ticket, id }]
    }

    /// 过滤输入模式
    fn handle_filter_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.filter.clear();
                self.filtering = false;
            }
            KeyCode::Enter => self.filtering = false,
            KeyCode::Backspace => {
                self.filter.pop();
            }
            KeyCode::Char(c) => self.filter.push(c),
            _ => {}
        }
        self.cursor.select_first();
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if self.contacts.is_loading() || self.deleting.is_some() {
            return Vec::new();
        }

        if let Some((id, _)) = self.confirm_delete.take() {
            if matches!(key.code, KeyCode::Char('y' | 'Y')) {
                return self.delete(id);
            }
            return Vec::new();
        }

        if self.filtering {
            self.handle_filter_key(key);
            return Vec::new();
        }

        self.notice = None;

        if self.contacts.error().is_some() {
            if key.code == KeyCode::Char('r') {
                return self.retry();
            }
            return Vec::new();
        }

        let len = self.visible().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.select_next(len),
            KeyCode::Home | KeyCode::Char('g') => self.cursor.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.cursor.select_last(len),
            KeyCode::PageUp => self.cursor.page_up(self.page_size()),
            KeyCode::PageDown => self.cursor.page_down(len, self.page_size()),
            KeyCode::Char('/') => self.filtering = true,
            KeyCode::Esc => self.filter.clear(),
            KeyCode::Char('r') => return self.retry(),
            KeyCode::Char('a' | 'n') => {
                return vec![emit(NavigationMessage::to(ViewId::ContactCreate))];
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(s) = self.selected() {
                    return vec![emit(NavigationMessage::Navigate {
                        view: ViewId::ContactEdit,
                        title: Some(format!("Edit Contact: {}", s.contact.name)),
                        payload: Some(NavPayload::ContactId(s.contact.id)),
                    })];
                }
            }
            KeyCode::Char('d') => {
                if let Some(target) = self.selected().map(|s| (s.contact.id, s.contact.name.clone())) {
                    if self.confirm_destructive {
                        self.confirm_delete = Some(target);
                    } else {
                        return self.delete(target.0);
                    }
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_deleted(&mut self, ticket: Ticket, result: Result<EntityId, AppError>) -> Vec<Command> {
        if self.deleting != Some(ticket) {
            return Vec::new();
        }
        self.deleting = None;
        match result {
            Ok(id) => {
                self.notice = Some(format!("Deleted contact {id}"));
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
        let visible = self.visible();
        if visible.is_empty() {
            let text = if self.filter.is_empty() {
                "  No contacts yet. Press 'a' to add one."
            } else {
                "  No contacts match the filter."
            };
            frame.render_widget(
                Paragraph::new(vec![Line::from(""), Line::styled(text, Styles::muted())]),
                area,
            );
            return;
        }

        let header = Row::new(["ID", "Name", "Phone", "Company", "Forms"])
            .style(Styles::title())
            .bottom_margin(1);
        let rows: Vec<Row> = visible
            .iter()
            .map(|s| {
                let forms = if s.form_ids.is_empty() {
                    s.form_count.to_string()
                } else {
                    format!("{} ({})", s.form_count, s.form_ids.join(", "))
                };
                Row::new([
                    Cell::from(s.contact.id.to_string()),
                    Cell::from(s.contact.name.clone()),
                    Cell::from(s.contact.phone_number.clone()),
                    Cell::from(s.contact.company.clone()),
                    Cell::from(forms),
                ])
                .style(Style::default().fg(c.fg))
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Min(18),
                Constraint::Length(18),
                Constraint::Length(20),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .row_highlight_style(Styles::selected());

        let mut state = TableState::default();
        state.select(Some(self.cursor.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn status_line(&self) -> Option<Line<'static>> {
        if self.deleting.is_some() {
            return Some(Line::from(vec![
                Span::raw("  "),
                Span::raw(panel::spinner(self.tick)),
                Span::styled(" Deleting...", Styles::muted()),
            ]));
        }
        if self.filtering || !self.filter.is_empty() {
            let cursor = if self.filtering { "▎" } else { "" };
            return Some(Line::from(vec![
                Span::styled("  Filter: ", Styles::hint_key()),
                Span::raw(format!("{}{cursor}", self.filter)),
            ]));
        }
        self.notice
            .as_ref()
            .map(|n| Line::styled(format!("  {n}"), Styles::warning()))
    }
}

impl SubView for ContactsListView {
    fn handle(&mut self, msg: Message) -> Vec<Command> {
        match msg {
            // 已加载或失败的列表只在刷新键或强制刷新时重新加载
            Message::Activated(_) if self.contacts.phase() == Phase::Idle => {
                return self
                    .contacts
                    .start(ORIGIN)
                    .map(|ticket| Command::LoadContacts { ticket })
                    .into_iter()
                    .collect();
            }
            Message::Resize { height, .. } => self.height = height,
            Message::Tick => self.tick = self.tick.wrapping_add(1),
            Message::Preferences(ui) => self.confirm_destructive = ui.confirm_destructive,
            Message::Loaded { ticket, result } => {
                let result = expect_data(result, |d| match d {
                    LoadedData::Contacts(contacts) => Some(contacts),
                    _ => None,
                });
                if self.contacts.resolve(ticket, result) {
                    self.cursor.clamp(self.visible().len());
                }
            }
            Message::Deleted { ticket, result } => return self.on_deleted(ticket, result),
            Message::Key(key) => return self.handle_key(&key),
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        match render_mode(
            self.contacts.error().is_some(),
            self.contacts.is_loading(),
            false,
        ) {
            RenderMode::Error => {
                if let Some(e) = self.contacts.error() {
                    let hint = if e.is_retryable() {
                        "Press 'r' to retry"
                    } else {
                        "Press Esc to go back"
                    };
                    panel::render_error(frame, area, e, hint);
                }
            }
            RenderMode::Loading => {
                panel::render_loading(frame, area, "Loading contacts...", self.tick);
            }
            RenderMode::Done | RenderMode::Normal => {
                let rows =
                    Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);
                self.render_table(frame, rows[0]);
                if let Some(line) = self.status_line() {
                    frame.render_widget(Paragraph::new(line), rows[1]);
                }
                if let Some((_, name)) = &self.confirm_delete {
                    panel::render_confirm(frame, area, &format!("Delete contact '{name}'?"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ewctl_store::Contact;

    fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn summary(id: i64, name: &str, company: &str) -> ContactSummary {
        ContactSummary {
            contact: Contact {
                id,
                name: name.to_string(),
                company: company.to_string(),
                phone_number: format!("+55119{id:08}"),
                ..Contact::default()
            },
            ..ContactSummary::default()
        }
    }

    fn ready() -> ContactsListView {
        let mut view = ContactsListView::new();
        let cmds = view.handle(Message::Activated(None));
        view.handle(Message::Loaded {
            ticket: cmds[0].ticket().unwrap(),
            result: Ok(LoadedData::Contacts(vec![
                summary(1, "Ana Souza", "Acme"),
                summary(2, "Bruno Lima", "Globex"),
                summary(3, "Carla Dias", "acme labs"),
            ])),
        });
        view
    }

    #[test]
    fn filter_matches_name_and_company() {
        let mut view = ready();
        view.handle(key(KeyCode::Char('/')));
        for c in "acme".chars() {
            view.handle(key(KeyCode::Char(c)));
        }
        view.handle(key(KeyCode::Enter));
        let names: Vec<&str> = view.visible().iter().map(|s| s.contact.name.as_str()).collect();
        assert_eq!(names, ["Ana Souza", "Carla Dias"]);

        // 过滤后 d 作用于可见列表中的选中项
        view.handle(key(KeyCode::Char('j')));
        view.handle(key(KeyCode::Char('d')));
        assert_eq!(view.confirm_delete, Some((3, "Carla Dias".to_string())));
    }

    #[test]
    fn filter_keys_do_not_trigger_actions() {
        let mut view = ready();
        view.handle(key(KeyCode::Char('/')));
        assert!(view.handle(key(KeyCode::Char('a'))).is_empty());
        assert!(view.handle(key(KeyCode::Char('d'))).is_empty());
        assert_eq!(view.filter(), "ad");
        view.handle(key(KeyCode::Esc));
        assert_eq!(view.filter(), "");
    }

    #[test]
    fn add_navigates_to_create() {
        let mut view = ready();
        assert_eq!(
            view.handle(key(KeyCode::Char('a'))),
            vec![emit(NavigationMessage::to(ViewId::ContactCreate))]
        );
    }

    #[test]
    fn delete_without_confirmation_when_disabled() {
        let mut view = ready();
        view.handle(Message::Preferences(crate::backend::UiConfig {
            confirm_destructive: false,
            ..crate::backend::UiConfig::default()
        }));
        let cmds = view.handle(key(KeyCode::Char('d')));
        assert!(matches!(cmds.as_slice(), [Command::DeleteContact { id: 1, .. }]));
        // 删除进行中忽略按键
        assert!(view.handle(key(KeyCode::Char('r'))).is_empty());
    }
}
