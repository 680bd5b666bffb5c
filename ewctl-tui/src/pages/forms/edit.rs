//! 编辑表单（参数化视图）

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

use super::editor::FormEditor;
use crate::message::{Command, EntityKind, LoadedData, Message, NavigationMessage};
use crate::model::state::{render_mode, InputAction, Loadable, Phase, RenderMode, Submission};
use crate::model::ViewId;
use crate::pages::{emit, expect_data, SubView};
use crate::view::components::{form, panel};

const ORIGIN: ViewId = ViewId::FormEdit;

/// 编辑表单
///
/// 构建时只有目标 ID，`init` 发出按 ID 加载的命令；
/// 在加载完成前表单控件尚不存在，除匹配的加载结果外一律忽略。
/// 加载失败后该实例永久处于失败状态，只能重新导航创建新实例。
#[derive(Debug)]
pub struct FormEditView {
    id: String,
    load: Loadable<FormEditor>,
    submission: Submission,
    notice: Option<String>,
    tick: usize,
}

impl FormEditView {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            load: Loadable::new(),
            submission: Submission::default(),
            notice: None,
            tick: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn load(&self) -> &Loadable<FormEditor> {
        &self.load
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn back() -> Vec<Command> {
        vec![emit(NavigationMessage::BackToList(EntityKind::Form))]
    }

    /// 加载完成前的处理
    fn handle_unloaded(&mut self, msg: Message) -> Vec<Command> {
        match msg {
            Message::Loaded { ticket, result } => {
                let result = expect_data(result, |d| match d {
                    LoadedData::FormForEdit { form, contacts } => {
                        Some(FormEditor::from_form(&form, contacts))
                    }
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
        let form = match editor.build() {
            Ok(form) => form,
            Err(msg) => {
                self.notice = Some(msg);
                return Vec::new();
            }
        };
        if !editor.confirmed() {
            self.notice = Some("Set 'Save changes?' to Yes to submit".to_string());
            return Vec::new();
        }
        self.notice = None;
        let ticket = self.submission.begin(ORIGIN);
        vec![Command::UpdateForm { ticket, form }]
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

impl SubView for FormEditView {
    fn init(&mut self) -> Vec<Command> {
        if self.load.phase() != Phase::Idle {
            return Vec::new();
        }
        let id = self.id.clone();
        self.load
            .start(ORIGIN)
            .map(|ticket| Command::LoadFormForEdit { ticket, id })
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
                    log::info!("form {id} updated");
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
                _ => panel::render_loading(frame, area, "Loading form...", self.tick),
            }
            return;
        };

        match self.submission.render_mode() {
            RenderMode::Error => {
                if let Some(e) = self.submission.error() {
                    panel::render_error(frame, area, e, "Press any key to return to the form");
                }
            }
            RenderMode::Loading => panel::render_loading(frame, area, "Saving form...", self.tick),
            RenderMode::Done => panel::render_done(frame, area, "Form updated", Vec::new()),
            RenderMode::Normal => {
                form::render(editor.input(), frame, area, self.notice.as_deref());
            }
        }
    }

    fn desired_size(&self) -> Option<(u16, u16)> {
        Some((96, 20))
    }
}
