//! Authorization flow
//!
//! Subscribe attempt: look up stored user -> check read access -> decide
//! between done, login prompt and "not authorized" error.
//! Login attempt: check read access with fresh credentials -> persist them.

use std::sync::Arc;

use qr_subscribe_client::topic_url;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::Credential;

/// Outcome of a subscribe-page authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeCheck {
    /// Read access granted, the dialog can complete
    Authorized,
    /// Access refused and no credential stored for the server
    LoginRequired,
}

/// Authorization orchestration service
pub struct AuthorizationService {
    ctx: Arc<ServiceContext>,
}

impl AuthorizationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Check read access for the subscribe page.
    ///
    /// # Returns
    /// * `Ok(SubscribeCheck::Authorized)` - granted (anonymously or with the stored user)
    /// * `Ok(SubscribeCheck::LoginRequired)` - refused, no stored user
    /// * `Err(CoreError::NotAuthorized)` - refused for the stored user
    /// * `Err(CoreError::Connection)` - server unreachable or unexpected response
    pub async fn attempt_subscribe(&self, base_url: &str, topic: &str) -> CoreResult<SubscribeCheck> {
        let user = self.ctx.store().get_user(base_url).await?;
        let authorized = self
            .ctx
            .auth_client()
            .check_auth(base_url, topic, user.as_ref())
            .await
            .inspect_err(|e| log::warn!("Connection to topic failed: {e}"))?;

        if authorized {
            log::debug!("Access granted to topic {}", topic_url(base_url, topic));
            return Ok(SubscribeCheck::Authorized);
        }

        match user {
            Some(user) => {
                log::warn!(
                    "Access not allowed to topic {}, but user already exists",
                    topic_url(base_url, topic)
                );
                Err(CoreError::NotAuthorized(user.username))
            }
            None => {
                log::warn!(
                    "Access not allowed to topic {}, showing login dialog",
                    topic_url(base_url, topic)
                );
                Ok(SubscribeCheck::LoginRequired)
            }
        }
    }

    /// Check read access with freshly entered credentials and persist them on success.
    ///
    /// # Returns
    /// * `Ok(())` - granted, credential saved
    /// * `Err(CoreError::NotAuthorized)` - refused for this user
    /// * `Err(CoreError::Connection)` - server unreachable or unexpected response
    pub async fn attempt_login(
        &self,
        base_url: &str,
        topic: &str,
        username: &str,
        password: &str,
    ) -> CoreResult<()> {
        let user = Credential::new(base_url, username, password);
        log::debug!(
            "Checking read access for user {} to topic {}",
            user.username,
            topic_url(base_url, topic)
        );

        let authorized = self
            .ctx
            .auth_client()
            .check_auth(base_url, topic, Some(&user))
            .await
            .inspect_err(|e| log::warn!("Connection to topic failed during login: {e}"))?;

        if !authorized {
            log::warn!(
                "Access not allowed for user {} to topic {}",
                user.username,
                topic_url(base_url, topic)
            );
            return Err(CoreError::NotAuthorized(user.username));
        }

        log::debug!(
            "Access granted for user {} to topic {}, adding to database",
            user.username,
            topic_url(base_url, topic)
        );
        self.ctx.store().add_user(&user).await?;
        Ok(())
    }
}
