//! Authorization check client

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::{ClientError, Result};
use crate::http_client::HttpUtils;
use crate::types::{topic_auth_url, topic_url, Credential};
use crate::utils::log_sanitizer::{mask_secret, truncate_for_log};

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// HTTP client tuning.
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Checks read access to a topic.
#[derive(Clone)]
pub struct AuthCheckClient {
    client: Client,
}

impl AuthCheckClient {
    /// Create a client with default timeouts.
    pub fn new() -> Result<Self> {
        Self::with_options(ClientOptions::default())
    }

    /// Create a client with custom timeouts.
    pub fn with_options(options: ClientOptions) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| ClientError::Build {
                detail: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Whether `user` (or an anonymous client when `None`) may read `topic` on
    /// `base_url`.
    ///
    /// Returns `Ok(false)` for 401/403. Any other non-success status is an
    /// error.
    pub async fn check_auth(
        &self,
        base_url: &str,
        topic: &str,
        user: Option<&Credential>,
    ) -> Result<bool> {
        let url = topic_auth_url(base_url, topic);
        let parsed = Url::parse(&url).map_err(|e| ClientError::InvalidUrl {
            url: url.clone(),
            detail: e.to_string(),
        })?;

        let mut request = self.client.get(parsed);
        match user {
            Some(user) => {
                log::debug!(
                    "Checking read access for user {} (password {}) to topic {}",
                    user.username,
                    mask_secret(&user.password),
                    topic_url(base_url, topic)
                );
                request = request.basic_auth(&user.username, Some(&user.password));
            }
            None => {
                log::debug!(
                    "Checking anonymous read access to topic {}",
                    topic_url(base_url, topic)
                );
            }
        }

        let (status, body) = HttpUtils::execute_request(request, "GET", &url).await?;
        match status {
            200..=299 => Ok(true),
            401 | 403 => {
                log::debug!("Read access to {} denied ({status})", topic_url(base_url, topic));
                Ok(false)
            }
            _ => {
                log::warn!("Unexpected response {status} from {url}");
                Err(ClientError::UnexpectedStatus {
                    status,
                    body: (!body.is_empty()).then(|| truncate_for_log(&body)),
                })
            }
        }
    }
}
