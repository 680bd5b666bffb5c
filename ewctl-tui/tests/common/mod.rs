//! 共享测试工具和辅助函数

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ewctl_store::{FormSummary, QueryResult, SqlExecutor, StoreError};
use ewctl_tui::message::{Command, Message, Ticket};
use ewctl_tui::model::App;
use ewctl_tui::update;
use serde_json::Value;

/// 已执行 `init` 的控制器，返回启动命令
pub fn started() -> (App, Vec<Command>) {
    let mut app = App::default();
    let cmds = update::init(&mut app);
    (app, cmds)
}

pub fn press(app: &mut App, code: KeyCode) -> Vec<Command> {
    update::process(app, Message::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

pub fn ctrl(app: &mut App, c: char) -> Vec<Command> {
    update::process(
        app,
        Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)),
    )
}

pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

/// 唯一一条命令的票据
pub fn single_ticket(cmds: &[Command]) -> Ticket {
    assert_eq!(cmds.len(), 1, "expected exactly one command, got {cmds:?}");
    cmds[0].ticket().expect("command carries a ticket")
}

pub fn form_summary(id: &str, name: &str) -> FormSummary {
    FormSummary {
        id: id.to_string(),
        name: name.to_string(),
        field_count: 3,
        number_count: 1,
        ..FormSummary::default()
    }
}

/// 按 SQL 片段返回预设行的执行器
#[derive(Default)]
pub struct MockExecutor {
    calls: Mutex<Vec<String>>,
    rows: Mutex<Vec<(String, Vec<Value>)>>,
    failures: Mutex<Vec<(String, StoreError)>>,
}

impl MockExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, needle: &str, rows: Vec<Value>) {
        self.rows.lock().unwrap().push((needle.to_string(), rows));
    }

    pub fn fail(&self, needle: &str, error: StoreError) {
        self.failures
            .lock()
            .unwrap()
            .push((needle.to_string(), error));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SqlExecutor for MockExecutor {
    async fn query(&self, sql: &str, _params: Vec<Value>) -> ewctl_store::Result<QueryResult> {
        self.calls.lock().unwrap().push(sql.to_string());

        if let Some((_, e)) = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| sql.contains(needle.as_str()))
        {
            return Err(e.clone());
        }

        let rows = self.rows.lock().unwrap();
        let rows = rows
            .iter()
            .find(|(needle, _)| sql.contains(needle.as_str()))
            .map(|(_, rows)| {
                rows.iter()
                    .filter_map(|v| v.as_object().cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(QueryResult {
            rows,
            ..QueryResult::default()
        })
    }
}
