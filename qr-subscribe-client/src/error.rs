use serde::{Deserialize, Serialize};

/// Error returned by the authorization check client.
///
/// Every variant is a connection-level failure from the caller's point of
/// view: "not authorized" is *not* an error, it is `Ok(false)`.
///
/// The `Display` output is the raw message shown to the user, so it carries
/// no prefix.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "code")]
pub enum ClientError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("{detail}")]
    Network {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("Request timed out: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The server answered with a status that is neither success nor an auth refusal.
    #[error("Unexpected server response {status}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated), if any.
        body: Option<String>,
    },

    /// The base URL or topic does not form a valid request URL.
    #[error("Invalid URL '{url}': {detail}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {detail}")]
    Build {
        /// Error details.
        detail: String,
    },
}

impl ClientError {
    /// 是否为预期行为（用户输入等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. } | Self::UnexpectedStatus { .. })
    }
}

/// Client Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_displays_raw_detail() {
        let e = ClientError::Network {
            detail: "connection refused".into(),
        };
        assert_eq!(e.to_string(), "connection refused");
    }

    #[test]
    fn unexpected_status_display() {
        let e = ClientError::UnexpectedStatus {
            status: 500,
            body: Some("boom".into()),
        };
        assert_eq!(e.to_string(), "Unexpected server response 500");
        assert!(e.is_expected());
    }

    #[test]
    fn serializes_with_code_tag() {
        let e = ClientError::Timeout {
            detail: "10s".into(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["code"], "Timeout");
        assert_eq!(json["detail"], "10s");
    }
}
