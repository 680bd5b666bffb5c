//! Cloudflare D1 客户端

mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::http_client::{self, HttpReply};
use crate::traits::SqlExecutor;
use crate::types::QueryResult;
use crate::utils::log_sanitizer::{mask_secret, truncate_for_log};

use types::{D1QueryRequest, D1Response};

pub(crate) const D1_API_BASE: &str = "https://api.cloudflare.com/client/v4";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SOURCE: &str = "D1";

/// Cloudflare D1 数据库客户端
pub struct D1Client {
    client: Client,
    base_url: String,
    api_token: String,
}

impl D1Client {
    /// 创建客户端
    ///
    /// 只做本地校验，不会发起请求。
    pub fn new(account_id: &str, database_id: &str, api_token: &str) -> Result<Self> {
        for (field, value) in [
            ("account_id", account_id),
            ("database_id", database_id),
            ("api_token", api_token),
        ] {
            if value.trim().is_empty() {
                return Err(StoreError::InvalidInput {
                    field,
                    detail: "must not be empty".to_string(),
                });
            }
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Network {
                detail: format!("Failed to build HTTP client: {e}"),
            })?;

        log::debug!(
            "[{SOURCE}] client for database {database_id} (token {})",
            mask_secret(api_token)
        );

        Ok(Self {
            client,
            base_url: format!("{D1_API_BASE}/accounts/{account_id}/d1/database/{database_id}"),
            api_token: api_token.to_string(),
        })
    }

    /// 查询接口地址
    pub fn query_url(&self) -> String {
        format!("{}/query", self.base_url)
    }

    /// 把 HTTP 回复解析为第一个结果集
    pub fn decode(reply: &HttpReply) -> Result<QueryResult> {
        let envelope: D1Response = match serde_json::from_str(&reply.body) {
            Ok(envelope) => envelope,
            Err(_) if !reply.is_success() => {
                return Err(StoreError::Http {
                    status: reply.status,
                    body: truncate_for_log(&reply.body),
                });
            }
            Err(_) => http_client::parse_json(&reply.body, SOURCE)?,
        };

        if !envelope.success || !envelope.errors.is_empty() {
            let (code, message) = envelope
                .errors
                .into_iter()
                .next()
                .map_or((None, "D1 query failed".to_string()), |e| {
                    (Some(e.code), e.message)
                });
            log::warn!("[{SOURCE}] API error: {message}");
            return Err(StoreError::Api { code, message });
        }

        let set = envelope
            .result
            .into_iter()
            .next()
            .ok_or(StoreError::NoResults)?;
        if !set.success {
            log::warn!("[{SOURCE}] statement reported failure");
            return Err(StoreError::Api {
                code: None,
                message: "D1 statement failed".to_string(),
            });
        }

        Ok(QueryResult {
            rows: set.results,
            meta: set.meta,
        })
    }
}

#[async_trait]
impl SqlExecutor for D1Client {
    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<QueryResult> {
        let url = self.query_url();
        let body = D1QueryRequest {
            sql,
            params: &params,
        };
        log::debug!("[{SOURCE}] SQL: {}", truncate_for_log(sql.trim()));

        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&body);

        let reply = http_client::send(request, SOURCE, "POST", &url).await?;
        Self::decode(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: u16, body: &str) -> HttpReply {
        HttpReply {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn new_rejects_empty_credentials() {
        let result = D1Client::new("acc", "", "token");
        assert!(matches!(
            result,
            Err(StoreError::InvalidInput {
                field: "database_id",
                ..
            })
        ));
    }

    #[test]
    fn query_url_shape() {
        let Ok(client) = D1Client::new("acc", "db", "token") else {
            panic!("client should build");
        };
        assert_eq!(
            client.query_url(),
            "https://api.cloudflare.com/client/v4/accounts/acc/d1/database/db/query"
        );
    }

    #[test]
    fn decode_success() {
        let body = r#"{
            "result": [{
                "results": [{"id": "contact", "name": "Contact"}],
                "success": true,
                "meta": {"duration": 0.5, "last_row_id": 9, "rows_affected": 1, "rows_read": 1, "rows_written": 0}
            }],
            "success": true,
            "errors": []
        }"#;
        let Ok(result) = D1Client::decode(&reply(200, body)) else {
            panic!("decode should succeed");
        };
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.meta.last_row_id, 9);
    }

    #[test]
    fn decode_api_error_uses_first_message() {
        let body = r#"{"result": [], "success": false,
            "errors": [{"code": 7500, "message": "no such table: forms"}, {"code": 1, "message": "second"}]}"#;
        let result = D1Client::decode(&reply(400, body));
        assert_eq!(
            result,
            Err(StoreError::Api {
                code: Some(7500),
                message: "no such table: forms".to_string()
            })
        );
    }

    #[test]
    fn decode_failure_without_errors() {
        let result = D1Client::decode(&reply(200, r#"{"result": [], "success": false}"#));
        assert!(matches!(result, Err(StoreError::Api { code: None, .. })));
    }

    #[test]
    fn decode_empty_result_is_no_results() {
        let result = D1Client::decode(&reply(200, r#"{"result": [], "success": true}"#));
        assert_eq!(result, Err(StoreError::NoResults));
    }

    #[test]
    fn decode_non_json_error_status() {
        let result = D1Client::decode(&reply(502, "Bad Gateway"));
        assert!(matches!(result, Err(StoreError::Http { status: 502, .. })));
    }

    #[test]
    fn decode_non_json_success_is_parse_error() {
        let result = D1Client::decode(&reply(200, "<html>"));
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[test]
    fn decode_failed_statement_is_api_error() {
        let body = r#"{"result": [{"results": [], "success": false}], "success": true}"#;
        let result = D1Client::decode(&reply(200, body));
        assert_eq!(
            result,
            Err(StoreError::Api {
                code: None,
                message: "D1 statement failed".to_string()
            })
        );
    }

    #[test]
    fn decode_statement_without_success_flag() {
        let body = r#"{"result": [{"results": [{"n": 1}]}], "success": true}"#;
        let Ok(result) = D1Client::decode(&reply(200, body)) else {
            panic!("decode should succeed");
        };
        assert_eq!(result.rows.len(), 1);
    }
}
