//! Generic HTTP request helper
//!
//! Sends a prepared request, logs it, maps transport failures to
//! [`ClientError`], and reads the body. Status interpretation is left to the
//! caller.

use reqwest::RequestBuilder;

use crate::error::ClientError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the status code and response text.
    ///
    /// # Returns
    /// * `Ok((status_code, response_text))` - any HTTP status, including 4xx/5xx
    /// * `Err(ClientError::Timeout)` - the request timed out
    /// * `Err(ClientError::Network)` - any other transport error
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String), ClientError> {
        log::debug!("{method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout {
                    detail: e.to_string(),
                }
            } else {
                ClientError::Network {
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("Response Status: {status_code}");

        let response_text = response.text().await.map_err(|e| ClientError::Network {
            detail: format!("Failed to read response body: {e}"),
        })?;

        if !response_text.is_empty() {
            log::debug!("Response Body: {}", truncate_for_log(&response_text));
        }

        Ok((status_code, response_text))
    }
}
