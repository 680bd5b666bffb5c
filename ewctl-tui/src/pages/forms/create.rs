//! 新建表单

use crossterm::event::{KeyCode, KeyEvent};
use ewctl_store::types::webhook_url;
use ewctl_store::Contact;
use ratatui::{layout::Rect, text::Line, Frame};

use super::editor::FormEditor;
use crate::message::{Command, EntityKind, LoadedData, Message, NavigationMessage};
use crate::model::state::{InputAction, Loadable, Phase, RenderMode, Submission};
use crate::model::ViewId;
use crate::pages::{emit, expect_data, SubView};
use crate::view::components::{form, panel};
use crate::view::theme::Styles;

const ORIGIN: ViewId = ViewId::FormCreate;

/// 新建表单
#[derive(Debug)]
pub struct FormCreateView {
    editor: FormEditor,
    recipients: Loadable<Vec<Contact>>,
    submission: Submission,
    notice: Option<String>,
    created: Option<String>,
    worker_url: String,
    tick: usize,
}

impl FormCreateView {
    pub fn new(worker_url: impl Into<String>) -> Self {
        Self {
            editor: FormEditor::blank(),
            recipients: Loadable::new(),
            submission: Submission::default(),
            notice: None,
            created: None,
            worker_url: worker_url.into(),
            tick: 0,
        }
    }

    pub fn editor(&self) -> &FormEditor {
        &self.editor
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn reset(&mut self) {
        self.editor = FormEditor::blank();
        self.recipients = Loadable::new();
        self.submission = Submission::default();
        self.notice = None;
        self.created = None;
    }

    fn submit(&mut self) -> Vec<Command> {
        let form = match self.editor.build() {
            Ok(form) => form,
            Err(msg) => {
                self.notice = Some(msg);
                return Vec::new();
            }
        };
        if !self.editor.confirmed() {
            self.notice = Some("Set 'Create this form?' to Yes to submit".to_string());
            return Vec::new();
        }
        self.notice = None;
        let ticket = self.submission.begin(ORIGIN);
        vec![Command::CreateForm { ticket, form }]
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if self.submission.is_locked() {
            return Vec::new();
        }
        if key.code == KeyCode::Esc {
            return vec![emit(NavigationMessage::BackToList(EntityKind::Form))];
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

impl SubView for FormCreateView {
    fn handle(&mut self, msg: Message) -> Vec<Command> {
        match msg {
            Message::Activated(_) => {
                if self.submission.is_done() {
                    self.reset();
                }
                // 失败后再次进入时重试收件人加载
                let ticket = match self.recipients.phase() {
                    Phase::Idle => self.recipients.start(ORIGIN),
                    Phase::Failed => self.recipients.retry(ORIGIN),
                    Phase::Loading | Phase::Ready => None,
                };
                return ticket
                    .map(|ticket| Command::LoadRecipients { ticket })
                    .into_iter()
                    .collect();
            }
            Message::Tick => self.tick = self.tick.wrapping_add(1),
            Message::Loaded { ticket, result } => {
                let result = expect_data(result, |d| match d {
                    LoadedData::Recipients(contacts) => Some(contacts),
                    _ => None,
                });
                if self.recipients.resolve(ticket, result) {
                    if let Some(contacts) = self.recipients.data() {
                        self.editor.set_contacts(contacts.clone());
                    }
                }
            }
            Message::Created { ticket, result } => {
                if let Some(id) = self.submission.finish(ticket, result) {
                    log::info!("form {id} created");
                    self.created = Some(id.to_string());
                    return vec![emit(NavigationMessage::BackToList(EntityKind::Form))];
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
            RenderMode::Loading => panel::render_loading(frame, area, "Creating form...", self.tick),
            RenderMode::Done => {
                let id = self.created.as_deref().unwrap_or_default();
                panel::render_done(
                    frame,
                    area,
                    "Form created",
                    vec![
                        Line::styled("  Webhook URL:", Styles::muted()),
                        Line::from(format!("  {}", webhook_url(&self.worker_url, id))),
                    ],
                );
            }
            RenderMode::Normal => {
                let recipients_notice = match (self.recipients.is_loading(), self.recipients.error()) {
                    (true, _) => Some("Loading contacts...".to_string()),
                    (false, Some(e)) => Some(format!("Contacts unavailable: {e}")),
                    _ => None,
                };
                let notice = self.notice.clone().or(recipients_notice);
                form::render(self.editor.input(), frame, area, notice.as_deref());
            }
        }
    }

    fn desired_size(&self) -> Option<(u16, u16)> {
        Some((96, 20))
    }
}
