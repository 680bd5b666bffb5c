use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::utils::row::Row;

// ============ 查询结果 ============

/// 单条语句的执行结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub rows: Vec<Row>,
    pub meta: QueryMeta,
}

impl QueryResult {
    /// 第一行（聚合查询用）
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }
}

/// D1 返回的执行元数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryMeta {
    pub duration: f64,
    pub last_row_id: i64,
    pub rows_affected: i64,
    pub rows_read: i64,
    pub rows_written: i64,
}

// ============ 表单 ============

/// Elementor 表单的 webhook 配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub name: String,
    pub description: String,
    pub fields: Vec<FormField>,
    pub numbers: Vec<FormNumber>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 表单字段映射
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub id: i64,
    pub elementor_id: String,
    pub label: String,
    pub field_type: String,
    pub required: bool,
    pub position: i64,
}

impl FormField {
    pub fn new(elementor_id: &str, label: &str, field_type: &str, required: bool) -> Self {
        Self {
            id: 0,
            elementor_id: elementor_id.to_string(),
            label: label.to_string(),
            field_type: field_type.to_string(),
            required,
            position: 0,
        }
    }
}

/// 接收通知的 WhatsApp 号码
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormNumber {
    pub id: i64,
    pub phone_number: String,
    pub label: String,
    pub contact_id: Option<i64>,
}

impl FormNumber {
    /// 由联系人生成收件号码
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            id: 0,
            phone_number: contact.phone_number.clone(),
            label: contact.name.clone(),
            contact_id: Some(contact.id),
        }
    }
}

/// 列表页使用的表单摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub field_count: i64,
    pub number_count: i64,
}

// ============ 联系人 ============

/// 联系人
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub phone_number: String,
    pub name: String,
    pub company: String,
    pub role: String,
    pub notes: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 带使用统计的联系人
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactSummary {
    pub contact: Contact,
    pub form_count: i64,
    pub form_ids: Vec<String>,
}

// ============ 仪表盘 ============

/// 与 D1 的连接状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// 仪表盘统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_forms: i64,
    pub active_forms: i64,
    pub total_contacts: i64,
    pub webhooks_today: i64,
    pub last_webhook: Option<DateTime<Utc>>,
    pub connection: ConnectionStatus,
}

// ============ 辅助函数 ============

static PHONE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").ok());

/// 由表单名称生成 ID：小写，空格和下划线替换为 `-`，只保留 `[a-z0-9-]`
pub fn generate_form_id(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// 新建表单的默认字段
pub fn default_fields() -> Vec<FormField> {
    vec![
        FormField::new("name", "Name", "text", true),
        FormField::new("email", "Email", "email", true),
        FormField::new("phone", "Phone", "tel", false),
        FormField::new("message", "Message", "textarea", false),
    ]
}

/// 校验 E.164 风格的电话号码
pub fn validate_phone(phone: &str) -> Result<()> {
    let valid = PHONE_RE.as_ref().is_some_and(|re| re.is_match(phone));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidInput {
            field: "phone",
            detail: "invalid phone number format".to_string(),
        })
    }
}

/// 表单的 webhook 地址
pub fn webhook_url(worker_url: &str, form_id: &str) -> String {
    format!("{}/webhook/{form_id}", worker_url.trim_end_matches('/'))
}
