//! Webhook 测试客户端
//!
//! 模拟 Elementor 向 worker 投递表单提交，用于端到端验证配置。

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::{Result, StoreError};
use crate::http_client;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SOURCE: &str = "Webhook";

/// 请求体编码
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Json,
    /// Elementor 的原生格式：`fields[<key>][value]=...`
    FormUrlEncoded,
}

impl Encoding {
    /// 切换到另一种编码
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Json => Self::FormUrlEncoded,
            Self::FormUrlEncoded => Self::Json,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::FormUrlEncoded => write!(f, "form"),
        }
    }
}

/// 一次测试投递
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookRequest {
    pub form_id: String,
    pub fields: BTreeMap<String, String>,
    pub encoding: Encoding,
}

/// 投递结果；任何 HTTP 状态码都算作响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub duration: Duration,
}

/// Webhook 测试客户端
pub struct WebhookClient {
    client: Client,
    base_url: String,
}

impl WebhookClient {
    pub fn new(base_url: &str) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(StoreError::InvalidInput {
                field: "worker_url",
                detail: "must not be empty".to_string(),
            });
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Network {
                detail: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 目标地址 `{base}/webhook/{form_id}`
    pub fn url(&self, form_id: &str) -> String {
        format!("{}/webhook/{form_id}", self.base_url)
    }

    /// 生成请求体
    pub fn encode_body(request: &WebhookRequest) -> Result<String> {
        match request.encoding {
            Encoding::Json => {
                serde_json::to_string(&request.fields).map_err(|e| StoreError::Serialization {
                    detail: e.to_string(),
                })
            }
            Encoding::FormUrlEncoded => Ok(request
                .fields
                .iter()
                .map(|(key, value)| {
                    format!(
                        "{}={}",
                        urlencoding::encode(&format!("fields[{key}][value]")),
                        urlencoding::encode(value)
                    )
                })
                .collect::<Vec<_>>()
                .join("&")),
        }
    }

    /// 发送测试请求
    pub async fn send(&self, request: &WebhookRequest) -> Result<WebhookResponse> {
        if request.form_id.trim().is_empty() {
            return Err(StoreError::InvalidInput {
                field: "form_id",
                detail: "form id is required".to_string(),
            });
        }

        let url = self.url(&request.form_id);
        let body = Self::encode_body(request)?;
        let builder = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, request.encoding.content_type())
            .body(body);

        let started = Instant::now();
        let reply = http_client::send(builder, SOURCE, "POST", &url).await?;

        Ok(WebhookResponse {
            status: reply.status,
            headers: reply.headers,
            body: reply.body,
            duration: started.elapsed(),
        })
    }
}

/// 示例提交数据
pub fn sample_data() -> BTreeMap<String, String> {
    [
        ("name", "John Doe"),
        ("email", "john.doe@example.com"),
        ("phone", "+1 234 567 8900"),
        ("company", "Acme Corp"),
        (
            "message",
            "This is a test message from the webhook testing tool.",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// 格式化耗时：µs / ms / 两位小数的 s
pub fn format_duration(d: Duration) -> String {
    if d < Duration::from_millis(1) {
        format!("{}µs", d.as_micros())
    } else if d < Duration::from_secs(1) {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

/// 每行一个 `name: value`
pub fn format_headers(headers: &[(String, String)]) -> String {
    let mut out = String::new();
    for (name, value) in headers {
        let _ = writeln!(out, "{name}: {value}");
    }
    out
}

/// 合法 JSON 缩进输出，否则原样返回
pub fn pretty_json(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| text.to_string())
}
