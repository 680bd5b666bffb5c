//! 新建联系人

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, text::Line, Frame};

use super::editor::ContactEditor;
use crate::message::{Command, EntityKind, Message, NavigationMessage};
use crate::model::state::{InputAction, RenderMode, Submission};
use crate::model::ViewId;
use crate::pages::{emit, SubView};
use crate::view::components::{form, panel};
use crate::view::theme::Styles;

const ORIGIN: ViewId = ViewId::ContactCreate;

/// 新建联系人
#[derive(Debug)]
pub struct ContactCreateView {
    editor: ContactEditor,
    submission: Submission,
    notice: Option<String>,
    created: Option<String>,
    tick: usize,
}

impl Default for ContactCreateView {
    fn default() -> Self {
        Self {
            editor: ContactEditor::blank(),
            submission: Submission::default(),
            notice: None,
            created: None,
            tick: 0,
        }
    }
}

impl ContactCreateView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editor(&self) -> &ContactEditor {
        &self.editor
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn submit(&mut self) -> Vec<Command> {
        let contact = match self.editor.build() {
            Ok(contact) => contact,
            Err(msg) => {
                self.notice = Some(msg);
                return Vec::new();
            }
        };
        if !self.editor.confirmed() {
            self.notice = Some(format!(
                "Set '{}' to Yes to submit",
                self.editor.confirm_label()
            ));
            return Vec::new();
        }
        self.notice = None;
        let ticket = self.submission.begin(ORIGIN);
        vec![Command::CreateContact { ticket, contact }]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if self.submission.is_locked() {
            return Vec::new();
        }
        if key.code == KeyCode::Esc {
            return vec![emit(NavigationMessage::BackToList(EntityKind::Contact))];
        }
        if self.submission.dismiss_error() {
            return Vec::new();
        }

        match self.editor.handle_key(key) {
            InputAction::Submit => self.submit(),
            InputAction::Changed(_) => {
                self.notice = None;
                Vec::new()
            }
            InputAction::None => Vec::new(),
        }
    }
}

impl SubView for ContactCreateView {
    fn handle(&mut self, msg: Message) -> Vec<Command> {
        match msg {
            Message::Activated(_) => {
                if self.submission.is_done() {
                    *self = Self::default();
                }
            }
            Message::Tick => self.tick = self.tick.wrapping_add(1),
            Message::Created { ticket, result } => {
                if let Some(id) = self.submission.finish(ticket, result) {
                    log::info!("contact {id} created");
                    self.created = Some(id.to_string());
                    return vec![emit(NavigationMessage::BackToList(EntityKind::Contact))];
                }
            }
            Message::Key(key) => return self.handle_key(&key),
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        match self.submission.render_mode() {
            RenderMode::Error => {
                if let Some(e) = self.submission.error() {
                    panel::render_error(frame, area, e, "Press any key to return to the form");
                }
            }
            RenderMode::Loading => {
                panel::render_loading(frame, area, "Creating contact...", self.tick);
            }
            RenderMode::Done => {
                let id = self.created.as_deref().unwrap_or_default();
                panel::render_done(
                    frame,
                    area,
                    "Contact created",
                    vec![Line::styled(format!("  Contact {id}"), Styles::muted())],
                );
            }
            RenderMode::Normal => {
                form::render(self.editor.input(), frame, area, self.notice.as_deref());
            }
        }
    }

    fn desired_size(&self) -> Option<(u16, u16)> {
        Some((80, 18))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::message::EntityId;
    use crossterm::event::KeyModifiers;

    fn press(view: &mut ContactCreateView, code: KeyCode) -> Vec<Command> {
        view.handle(Message::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(view: &mut ContactEditor, text: &str) {
        for c in text.chars() {
            view.handle_key(&KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn filled() -> ContactCreateView {
        let mut view = ContactCreateView::new();
        type_text(&mut view.editor, "Ana");
        press(&mut view, KeyCode::Tab);
        type_text(&mut view.editor, "5511999999999");
        view
    }

    #[test]
    fn unconfirmed_submit_only_sets_notice() {
        let mut view = filled();
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(view.handle(Message::Key(ctrl_s)).is_empty());
        assert_eq!(view.notice(), Some("Set 'Create this contact?' to Yes to submit"));
    }

    #[test]
    fn confirmed_submit_creates_and_returns_to_list() {
        let mut view = filled();
        for _ in 0..4 {
            press(&mut view, KeyCode::Tab);
        }
        press(&mut view, KeyCode::Char('y'));
        let cmds = press(&mut view, KeyCode::Enter);
        let [Command::CreateContact { ticket, contact }] = cmds.as_slice() else {
            panic!("expected create, got {cmds:?}");
        };
        assert_eq!(contact.phone_number, "5511999999999");

        // 提交期间锁定
        assert!(press(&mut view, KeyCode::Esc).is_empty());

        let cmds = view.handle(Message::Created {
            ticket: *ticket,
            result: Ok(EntityId::Contact(12)),
        });
        assert_eq!(
            cmds,
            vec![emit(NavigationMessage::BackToList(EntityKind::Contact))]
        );
    }

    #[test]
    fn stale_result_is_ignored() {
        let mut view = filled();
        let stale = crate::message::Ticket::issue(ORIGIN);
        let cmds = view.handle(Message::Created {
            ticket: stale,
            result: Err(AppError::SubmitFailed("late".into())),
        });
        assert!(cmds.is_empty());
        assert!(view.submission().error().is_none());
    }
}
