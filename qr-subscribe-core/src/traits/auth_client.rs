//! Authorization check abstract Trait

use async_trait::async_trait;
use qr_subscribe_client::{AuthCheckClient, Credential};

use crate::error::CoreResult;

/// Read-access check against a topic server
///
/// Implementation:
/// - `AuthCheckClient` (HTTP, `qr-subscribe-client`)
/// - test mocks
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Whether `user` (anonymous when `None`) may read `topic` on `base_url`.
    ///
    /// # Returns
    /// * `Ok(true)` - authorized
    /// * `Ok(false)` - not authorized
    /// * `Err(CoreError::Connection)` - network or protocol failure
    async fn check_auth(
        &self,
        base_url: &str,
        topic: &str,
        user: Option<&Credential>,
    ) -> CoreResult<bool>;
}

#[async_trait]
impl AuthClient for AuthCheckClient {
    async fn check_auth(
        &self,
        base_url: &str,
        topic: &str,
        user: Option<&Credential>,
    ) -> CoreResult<bool> {
        Ok(AuthCheckClient::check_auth(self, base_url, topic, user).await?)
    }
}
