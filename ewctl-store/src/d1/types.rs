//! Cloudflare D1 API 类型定义

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::QueryMeta;
use crate::utils::row::Row;

/// `POST /query` 请求体
#[derive(Debug, Serialize)]
pub struct D1QueryRequest<'a> {
    pub sql: &'a str,
    pub params: &'a [Value],
}

/// D1 通用响应
#[derive(Debug, Deserialize)]
pub struct D1Response {
    #[serde(default)]
    pub result: Vec<D1ResultSet>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<D1ApiError>,
}

/// 单条语句的结果集
#[derive(Debug, Deserialize)]
pub struct D1ResultSet {
    #[serde(default)]
    pub results: Vec<Row>,
    /// 缺省时视为成功，只有显式的 `false` 才算失败
    #[serde(default = "statement_ok")]
    pub success: bool,
    #[serde(default)]
    pub meta: QueryMeta,
}

fn statement_ok() -> bool {
    true
}

/// D1 错误
#[derive(Debug, Deserialize)]
pub struct D1ApiError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}
