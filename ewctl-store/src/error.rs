use thiserror::Error;

/// Unified error type for store and webhook operations.
///
/// Every variant is cheap to clone so results can be handed across the
/// UI message boundary without wrapping them in `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A network-level error (DNS resolution failure, connection refused, TLS, ...).
    #[error("Network error: {detail}")]
    Network {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The endpoint answered with a non-success HTTP status and a body that
    /// is not a D1 envelope.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw (possibly truncated) response body.
        body: String,
    },

    /// D1 reported `success = false` or returned an error list.
    #[error("D1 error: {message}")]
    Api {
        /// Numeric error code, when the API supplied one.
        code: Option<i64>,
        /// Error message from the API.
        message: String,
    },

    /// The query envelope carried no result set.
    #[error("no results returned")]
    NoResults,

    /// A lookup by id matched no row.
    #[error("{entity} not found")]
    NotFound {
        /// Entity kind, e.g. `"form"` or `"contact"`.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// Failed to parse a response body.
    #[error("Parse error: {detail}")]
    Parse {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    #[error("Serialization error: {detail}")]
    Serialization {
        /// Details about the serialization failure.
        detail: String,
    },

    /// Caller supplied a value the store refuses before any request is made.
    #[error("Invalid {field}: {detail}")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// Description of what's wrong.
        detail: String,
    },
}

impl StoreError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::NotFound { .. } | Self::InvalidInput { .. }
        )
    }
}

/// Convenience type alias for `Result<T, StoreError>`.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_api_error() {
        let e = StoreError::Api {
            code: Some(7500),
            message: "no such table: forms".to_string(),
        };
        assert_eq!(e.to_string(), "D1 error: no such table: forms");
    }

    #[test]
    fn display_not_found() {
        let e = StoreError::NotFound {
            entity: "contact",
            id: "7".to_string(),
        };
        assert_eq!(e.to_string(), "contact not found");
    }

    #[test]
    fn display_no_results() {
        assert_eq!(StoreError::NoResults.to_string(), "no results returned");
    }

    #[test]
    fn display_http() {
        let e = StoreError::Http {
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(e.to_string(), "HTTP 401: unauthorized");
    }

    #[test]
    fn expected_classification() {
        assert!(StoreError::NotFound { entity: "form", id: "x".into() }.is_expected());
        assert!(
            StoreError::InvalidInput {
                field: "phone",
                detail: "bad".into()
            }
            .is_expected()
        );
        assert!(!StoreError::Network { detail: "x".into() }.is_expected());
        assert!(!StoreError::Timeout { detail: "x".into() }.is_expected());
        assert!(!StoreError::Parse { detail: "x".into() }.is_expected());
    }
}
