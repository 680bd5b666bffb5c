//! 行数据宽松转换工具
//!
//! D1 以 JSON 对象返回每一行，数字统一是 JSON number（可能带小数），
//! 时间是 SQLite 的 `CURRENT_TIMESTAMP` 文本。这里的函数逐字段读取：
//! 缺失或类型不符时退化为零值，而不是报错。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// 一行查询结果
pub type Row = Map<String, Value>;

/// 读取文本字段，非字符串返回空串
pub fn text(row: &Row, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// 读取整数字段
///
/// 接受整数、浮点（截断）以及数字字符串（`GROUP_CONCAT` 之类的聚合有时返回文本）。
pub fn int(row: &Row, key: &str) -> i64 {
    opt_int(row, key).unwrap_or(0)
}

/// 读取可空整数字段，`NULL` 或无法识别时为 `None`
#[allow(clippy::cast_possible_truncation)]
pub fn opt_int(row: &Row, key: &str) -> Option<i64> {
    match row.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// 读取布尔字段：非零数字、`true` 或 `"1"` 视为真
pub fn flag(row: &Row, key: &str) -> bool {
    match row.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
        _ => false,
    }
}

/// 读取时间字段：RFC3339 或 SQLite `YYYY-MM-DD HH:MM:SS`（按 UTC 解释）
pub fn timestamp(row: &Row, key: &str) -> Option<DateTime<Utc>> {
    let Some(Value::String(s)) = row.get(key) else {
        return None;
    };
    parse_timestamp(s)
}

/// 解析时间文本，两种格式都不匹配时返回 `None`
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// 逗号分隔的文本字段拆成列表，空串得到空列表
pub fn list(row: &Row, key: &str) -> Vec<String> {
    text(row, key)
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
