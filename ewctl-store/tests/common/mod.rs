//! 共享测试工具和辅助函数

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ewctl_store::{QueryMeta, QueryResult, SqlExecutor, StoreError};
use serde_json::Value;

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 一次记录下来的调用
#[derive(Debug, Clone)]
pub struct Call {
    pub sql: String,
    pub params: Vec<Value>,
}

enum Reply {
    Rows(Vec<Value>, QueryMeta),
    Fail(StoreError),
}

/// 按 SQL 片段匹配返回预设结果的执行器
///
/// 未匹配的语句返回空结果集。规则按添加顺序匹配，先到先得。
#[derive(Default)]
pub struct MockExecutor {
    calls: Mutex<Vec<Call>>,
    rules: Mutex<Vec<(String, Reply)>>,
}

impl MockExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, needle: &str, rows: Vec<Value>) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Reply::Rows(rows, QueryMeta::default())));
    }

    pub fn respond_meta(&self, needle: &str, meta: QueryMeta) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Reply::Rows(Vec::new(), meta)));
    }

    pub fn fail(&self, needle: &str, error: StoreError) {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Reply::Fail(error)));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.sql.contains(needle))
            .count()
    }
}

#[async_trait]
impl SqlExecutor for MockExecutor {
    async fn query(&self, sql: &str, params: Vec<Value>) -> ewctl_store::Result<QueryResult> {
        self.calls.lock().unwrap().push(Call {
            sql: sql.to_string(),
            params,
        });

        let rules = self.rules.lock().unwrap();
        let Some((_, reply)) = rules.iter().find(|(needle, _)| sql.contains(needle.as_str()))
        else {
            return Ok(QueryResult::default());
        };

        match reply {
            Reply::Rows(rows, meta) => Ok(QueryResult {
                rows: rows
                    .iter()
                    .filter_map(|v| v.as_object().cloned())
                    .collect(),
                meta: meta.clone(),
            }),
            Reply::Fail(e) => Err(e.clone()),
        }
    }
}

pub fn api_error(message: &str) -> StoreError {
    StoreError::Api {
        code: Some(7500),
        message: message.to_string(),
    }
}
