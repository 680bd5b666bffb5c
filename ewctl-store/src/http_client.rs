//! Request plumbing shared by [`D1Client`](crate::D1Client) and
//! [`WebhookClient`](crate::WebhookClient).
//!
//! Callers build their own `RequestBuilder` and decide how to interpret
//! the body; this module only sends, logs and maps transport failures.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Send a request and collect status, headers and body text.
///
/// No retry is attempted; a failed request surfaces once.
///
/// # Arguments
/// * `request` - configured request (URL, headers, body)
/// * `source` - client name used as the log prefix
/// * `method_name` - HTTP method, for logs
/// * `url` - target URL, for logs
pub async fn send(
    request: RequestBuilder,
    source: &str,
    method_name: &str,
    url: &str,
) -> Result<HttpReply, StoreError> {
    log::debug!("[{source}] {method_name} {url}");

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            StoreError::Timeout {
                detail: e.to_string(),
            }
        } else {
            StoreError::Network {
                detail: e.to_string(),
            }
        }
    })?;

    let status = response.status().as_u16();
    log::debug!("[{source}] Response Status: {status}");

    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or("<binary>").to_string(),
            )
        })
        .collect();

    let body = response.text().await.map_err(|e| StoreError::Network {
        detail: format!("Failed to read response body: {e}"),
    })?;

    log::debug!("[{source}] Response Body: {}", truncate_for_log(&body));

    Ok(HttpReply {
        status,
        headers,
        body,
    })
}

/// Decode a JSON body; the raw text is logged when it does not parse.
pub fn parse_json<T>(text: &str, source: &str) -> Result<T, StoreError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(text).map_err(|e| {
        log::error!("[{source}] JSON parse failed: {e}");
        log::error!("[{source}] Raw response: {}", truncate_for_log(text));
        StoreError::Parse {
            detail: e.to_string(),
        }
    })
}

/// Raw HTTP reply
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpReply {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_envelope_shaped_json() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Envelope {
            success: bool,
        }
        let result: Result<Envelope, StoreError> = parse_json(r#"{"success":true}"#, "test");
        assert_eq!(result, Ok(Envelope { success: true }));
    }

    #[test]
    fn html_error_page_is_a_parse_error() {
        let result: Result<serde_json::Value, StoreError> =
            parse_json("<html>502 Bad Gateway</html>", "test");
        assert!(matches!(result, Err(StoreError::Parse { .. })), "{result:?}");
    }

    #[test]
    fn success_range() {
        let reply = |status| HttpReply {
            status,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(reply(200).is_success());
        assert!(reply(204).is_success());
        assert!(!reply(301).is_success());
        assert!(!reply(500).is_success());
    }
}
