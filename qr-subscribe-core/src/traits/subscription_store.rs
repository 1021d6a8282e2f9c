//! Subscription/user persistence abstract Trait

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::types::{Credential, StoreSnapshot, Subscription};

/// Subscription and per-server credential store
///
/// Platform implementation:
/// - `InMemorySubscriptionStore` (this crate, default)
/// - `JsonFileStore` (`qr-subscribe-app`)
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Stored credential for a server
    ///
    /// # Returns
    /// * `Ok(Some(user))` - a credential exists
    /// * `Ok(None)` - anonymous access
    async fn get_user(&self, base_url: &str) -> CoreResult<Option<Credential>>;

    /// Save a credential, replacing any existing one for the same server
    async fn add_user(&self, user: &Credential) -> CoreResult<()>;

    /// Existing subscription for (`base_url`, `topic`)
    async fn get_subscription(&self, base_url: &str, topic: &str)
        -> CoreResult<Option<Subscription>>;

    /// Save a subscription, replacing any existing one for the same target
    async fn add_subscription(&self, subscription: &Subscription) -> CoreResult<()>;

    /// User-configured default server
    async fn get_default_base_url(&self) -> CoreResult<Option<String>>;
}

/// In-memory store
///
/// Default implementation, available on all platforms.
#[derive(Clone, Default)]
pub struct InMemorySubscriptionStore {
    data: Arc<RwLock<StoreSnapshot>>,
}

impl InMemorySubscriptionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled from a snapshot
    #[must_use]
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            data: Arc::new(RwLock::new(snapshot)),
        }
    }

    pub async fn set_default_base_url(&self, base_url: Option<String>) {
        self.data.write().await.default_base_url = base_url;
    }

    /// Copy of the current contents
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.data.read().await.clone()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn get_user(&self, base_url: &str) -> CoreResult<Option<Credential>> {
        Ok(self.data.read().await.user(base_url).cloned())
    }

    async fn add_user(&self, user: &Credential) -> CoreResult<()> {
        self.data.write().await.upsert_user(user.clone());
        Ok(())
    }

    async fn get_subscription(
        &self,
        base_url: &str,
        topic: &str,
    ) -> CoreResult<Option<Subscription>> {
        Ok(self.data.read().await.subscription(base_url, topic).cloned())
    }

    async fn add_subscription(&self, subscription: &Subscription) -> CoreResult<()> {
        self.data
            .write()
            .await
            .upsert_subscription(subscription.clone());
        Ok(())
    }

    async fn get_default_base_url(&self) -> CoreResult<Option<String>> {
        Ok(self.data.read().await.default_base_url.clone())
    }
}
