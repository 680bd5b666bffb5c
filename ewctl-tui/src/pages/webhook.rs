//! Webhook 测试视图

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ewctl_store::webhook::{format_duration, format_headers, pretty_json, sample_data};
use ewctl_store::{Encoding, WebhookRequest, WebhookResponse};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::message::{Command, Message, NavPayload};
use crate::model::state::{Field, InputAction, InputForm, RenderMode, Submission};
use crate::model::ViewId;
use crate::pages::SubView;
use crate::view::components::{form, panel};
use crate::view::theme::Styles;

const ORIGIN: ViewId = ViewId::WebhookTest;

/// 随请求发送的提交字段
const SUBMISSION_FIELDS: [&str; 4] = ["name", "email", "phone", "message"];

/// Webhook 测试
#[derive(Debug)]
pub struct WebhookView {
    input: InputForm,
    encoding: Encoding,
    submission: Submission,
    response: Option<WebhookResponse>,
    notice: Option<String>,
    tick: usize,
}

impl Default for WebhookView {
    fn default() -> Self {
        Self {
            input: Self::blank_input(),
            encoding: Encoding::default(),
            submission: Submission::default(),
            response: None,
            notice: None,
            tick: 0,
        }
    }
}

impl WebhookView {
    pub fn new() -> Self {
        Self::default()
    }

    fn blank_input() -> InputForm {
        InputForm::new(vec![
            Field::text("form_id", "Form ID").with_placeholder("e.g. contact-form"),
            Field::text("name", "Name"),
            Field::text("email", "Email"),
            Field::text("phone", "Phone"),
            Field::text("message", "Message"),
        ])
    }

    pub fn input(&self) -> &InputForm {
        &self.input
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn response(&self) -> Option<&WebhookResponse> {
        self.response.as_ref()
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// 用示例数据填充提交字段，保留表单 ID
    fn fill_sample(&mut self) {
        let sample = sample_data();
        for key in SUBMISSION_FIELDS {
            if let Some(value) = sample.get(key) {
                self.input.set_value(key, value.clone());
            }
        }
        self.notice = Some("Sample data loaded".to_string());
    }

    fn build_request(&self) -> Result<WebhookRequest, String> {
        let form_id = self.input.value("form_id");
        if form_id.is_empty() {
            return Err("Form ID is required".to_string());
        }
        let fields: BTreeMap<String, String> = SUBMISSION_FIELDS
            .iter()
            .map(|key| (*key, self.input.value(key)))
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Ok(WebhookRequest {
            form_id: form_id.to_string(),
            fields,
            encoding: self.encoding,
        })
    }

    fn send(&mut self) -> Vec<Command> {
        match self.build_request() {
            Ok(request) => {
                self.notice = None;
                let ticket = self.submission.begin(ORIGIN);
                vec![Command::SendWebhook { ticket, request }]
            }
            Err(msg) => {
                self.notice = Some(msg);
                Vec::new()
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Command> {
        if self.submission.is_pending() {
            return Vec::new();
        }
        // 结果面板或错误面板：任意键回到表单
        if self.submission.is_done() || self.submission.error().is_some() {
            self.submission = Submission::default();
            self.response = None;
            return Vec::new();
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('g') => {
                    self.fill_sample();
                    return Vec::new();
                }
                KeyCode::Char('e') => {
                    self.encoding = self.encoding.toggle();
                    return Vec::new();
                }
                _ => {}
            }
        }

        match self.input.handle_key(key) {
            InputAction::Submit => self.send(),
            InputAction::Changed(_) => {
                self.notice = None;
                Vec::new()
            }
            InputAction::None => Vec::new(),
        }
    }

    fn response_lines(response: &WebhookResponse) -> Vec<Line<'static>> {
        let status_style = if (200..300).contains(&response.status) {
            Styles::success()
        } else {
            Styles::error()
        };
        let mut lines = vec![
            Line::from(vec![
                Span::styled("  Status: ", Styles::hint_key()),
                Span::styled(response.status.to_string(), status_style),
                Span::styled("   Duration: ", Styles::hint_key()),
                Span::raw(format_duration(response.duration)),
            ]),
            Line::from(""),
            Line::styled("  Headers:", Styles::hint_key()),
        ];
        lines.extend(
            format_headers(&response.headers)
                .lines()
                .map(|l| Line::from(format!("    {l}"))),
        );
        lines.push(Line::from(""));
        lines.push(Line::styled("  Body:", Styles::hint_key()));
        lines.extend(
            pretty_json(&response.body)
                .lines()
                .map(|l| Line::from(format!("    {l}"))),
        );
        lines.push(Line::from(""));
        lines.push(Line::styled(
            "  Press any key to return to the form",
            Styles::muted(),
        ));
        lines
    }
}

impl SubView for WebhookView {
    fn handle(&mut self, msg: Message) -> Vec<Command> {
        match msg {
            Message::Activated(Some(NavPayload::FormId(id))) => {
                self.input.set_value("form_id", id);
                self.input.focus("name");
            }
            Message::Tick => self.tick = self.tick.wrapping_add(1),
            Message::WebhookSent { ticket, result } => {
                if let Some(response) = self.submission.finish(ticket, result) {
                    log::info!("webhook test answered with {}", response.status);
                    self.response = Some(response);
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
                panel::render_loading(frame, area, "Sending webhook...", self.tick);
            }
            RenderMode::Done => {
                if let Some(response) = &self.response {
                    frame.render_widget(
                        Paragraph::new(Self::response_lines(response)).wrap(Wrap { trim: false }),
                        area,
                    );
                }
            }
            RenderMode::Normal => {
                let rows =
                    Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(area);
                let encoding = Line::from(vec![
                    Span::styled("  Encoding: ", Styles::hint_key()),
                    Span::raw(self.encoding.content_type()),
                    Span::styled("  (Ctrl+E to toggle)", Styles::muted()),
                ]);
                frame.render_widget(Paragraph::new(encoding), rows[0]);
                form::render(&self.input, frame, rows[1], self.notice.as_deref());
            }
        }
    }

    fn desired_size(&self) -> Option<(u16, u16)> {
        Some((100, 22))
    }
}
