//! 编辑联系人（参数化视图）

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

use super::editor::ContactEditor;
use crate::message::{Command, EntityKind, LoadedData, Message, NavigationMessage};
use crate::model::state::{render_mode, InputAction, Loadable, Phase, RenderMode, Submission};
use crate::model::ViewId;
use crate::pages::{emit, expect_data, SubView};
use crate::view::components::{form, panel};

const ORIGIN: ViewId = ViewId::ContactEdit;

/// 编辑联系人
///
/// 与表单编辑相同：加载完成前只接受匹配的加载结果，失败后只能 Esc 返回。
#[derive(Debug)]
pub struct ContactEditView {
    id: i64,
    load: Loadable<ContactEditor>,
    submission: Submission,
    notice: Option<String>,
    tick: usize,
}

impl ContactEditView {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            load: Loadable::new(),
            submission: Submission::default(),
            notice: None,
            tick: 0,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn load(&self) -> &Loadable<ContactEditor> {
        &self.load
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn back() -> Vec<Command> {
        vec![emit(NavigationMessage::BackToList(EntityKind::Contact))]
    }

    fn handle_unloaded(&mut self, msg: Message) -> Vec<Command> {
        match msg {
            Message::Loaded { ticket, result } => {
                let result = expect_data(result, |d| match d {
                    LoadedData::Contact(contact) => Some(ContactEditor::from_contact(contact)),
                    _ => None,
                });
                self.load.resolve(ticket, result);
            }
            Message::Tick => self.tick = self.tick.wrapping_add(1),
            Message::Key(key) if key.code == KeyCode::Esc && self.load.error().is_some() => {
                return Self::back();
            }
            _ => {}
        }
        Vec::new()
    }

    fn submit(&mut self) -> Vec<Command> {
        let Some(editor) = self.load.data() else {
            return Vec::new();
        };
        let contact = match editor.build() {
            Ok(contact) => contact,
            Err(msg) => {
                self.notice = Some(msg);
                return Vec::new();
            }
        };
        if !editor.confirmed() {
            self.notice = Some(format!("Set '{}' to Yes to submit", editor.confirm_label()));
            return Vec::new();
        }
        self.notice = None;
        let ticket = self.submission.begin(ORIGIN);
        vec![Command::UpdateContact { ticket, contact }]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if self.submission.is_locked() {
            return Vec::new();
        }
        if key.code == KeyCode::Esc {
            return Self::back();
        }
        if self.submission.dismiss_error() {
            return Vec::new();
        }

        let Some(editor) = self.load.data_mut() else {
            return Vec::new();
        };
        match editor.handle_key(key) {
            InputAction::Submit => self.submit(),
            InputAction::Changed(_) => {
                self.notice = None;
                Vec::new()
            }
            InputAction::None => Vec::new(),
        }
    }
}

impl SubView for ContactEditView {
    fn init(&mut self) -> Vec<Command> {
        if self.load.phase() != Phase::Idle {
            return Vec::new();
        }
        let id = self.id;
        self.load
            .start(ORIGIN)
            .map(|ticket| Command::LoadContact { ticket, id })
            .into_iter()
            .collect()
    }

    fn handle(&mut self, msg: Message) -> Vec<Command> {
        if self.load.data().is_none() {
            return self.handle_unloaded(msg);
        }

        match msg {
            Message::Tick => self.tick = self.tick.wrapping_add(1),
            Message::Updated { ticket, result } => {
                if let Some(id) = self.submission.finish(ticket, result) {
                    log::info!("contact {id} updated");
                    return Self::back();
                }
            }
            Message::Key(key) => return self.handle_key(&key),
            _ => {}
        }
        Vec::new()
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(editor) = self.load.data() else {
            match render_mode(self.load.error().is_some(), self.load.is_loading(), false) {
                RenderMode::Error => {
                    if let Some(e) = self.load.error() {
                        panel::render_error(frame, area, e, "Press Esc to go back");
                    }
                }
                _ => panel::render_loading(frame, area, "Loading contact...", self.tick),
            }
            return;
        };

        match self.submission.render_mode() {
            RenderMode::Error => {
                if let Some(e) = self.submission.error() {
                    panel::render_error(frame, area, e, "Press any key to return to the form");
                }
            }
            RenderMode::Loading => {
                panel::render_loading(frame, area, "Saving contact...", self.tick);
            }
            RenderMode::Done => panel::render_done(frame, area, "Contact updated", Vec::new()),
            RenderMode::Normal => {
                form::render(editor.input(), frame, area, self.notice.as_deref());
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
    use crate::message::EntityId;
    use crossterm::event::KeyModifiers;
    use ewctl_store::Contact;

    fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn init_requests_contact_by_id() {
        let mut view = ContactEditView::new(42);
        let cmds = view.init();
        assert!(matches!(cmds.as_slice(), [Command::LoadContact { id: 42, .. }]));
        assert!(view.init().is_empty());
    }

    #[test]
    fn loaded_contact_is_editable_and_saved() {
        let mut view = ContactEditView::new(42);
        let cmds = view.init();
        view.handle(Message::Loaded {
            ticket: cmds[0].ticket().unwrap(),
            result: Ok(LoadedData::Contact(Contact {
                id: 42,
                name: "Ana".into(),
                phone_number: "+5511999999999".into(),
                ..Contact::default()
            })),
        });
        assert_eq!(view.load().data().unwrap().input().value("name"), "Ana");

        for _ in 0..5 {
            view.handle(key(KeyCode::Tab));
        }
        view.handle(key(KeyCode::Char('y')));
        let cmds = view.handle(key(KeyCode::Enter));
        let [Command::UpdateContact { ticket, contact }] = cmds.as_slice() else {
            panic!("expected update, got {cmds:?}");
        };
        assert_eq!(contact.id, 42);

        let cmds = view.handle(Message::Updated {
            ticket: *ticket,
            result: Ok(EntityId::Contact(42)),
        });
        assert_eq!(cmds, vec![emit(NavigationMessage::BackToList(EntityKind::Contact))]);
    }

    #[test]
    fn mismatched_payload_fails_load() {
        let mut view = ContactEditView::new(1);
        let cmds = view.init();
        view.handle(Message::Loaded {
            ticket: cmds[0].ticket().unwrap(),
            result: Ok(LoadedData::Contacts(Vec::new())),
        });
        assert!(view.load().error().is_some());
        assert_eq!(view.handle(key(KeyCode::Esc)), ContactEditView::back());
    }
}
