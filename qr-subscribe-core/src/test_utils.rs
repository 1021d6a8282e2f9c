//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use qr_subscribe_client::ClientError;
use tokio::sync::{Notify, RwLock};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{
    AuthClient, InMemorySubscriptionStore, QrScanner, SubscribeListener, SubscriptionStore,
};
use crate::types::{Credential, LumaFrame, Subscription};

// ===== MockAuthClient =====

/// One recorded `check_auth` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckCall {
    pub base_url: String,
    pub topic: String,
    pub username: Option<String>,
}

/// Scripted auth client.
///
/// Answers from a queue of results (`Ok(true)` once the queue is empty).
/// While held, calls block until `release` is called.
pub struct MockAuthClient {
    results: RwLock<VecDeque<CoreResult<bool>>>,
    calls: RwLock<Vec<CheckCall>>,
    gate: RwLock<Option<Arc<Notify>>>,
    started: Notify,
}

impl MockAuthClient {
    pub fn new() -> Self {
        Self {
            results: RwLock::new(VecDeque::new()),
            calls: RwLock::new(Vec::new()),
            gate: RwLock::new(None),
            started: Notify::new(),
        }
    }

    pub async fn push_result(&self, result: CoreResult<bool>) {
        self.results.write().await.push_back(result);
    }

    pub async fn calls(&self) -> Vec<CheckCall> {
        self.calls.read().await.clone()
    }

    /// Block subsequent calls until `release`.
    pub async fn hold(&self) {
        *self.gate.write().await = Some(Arc::new(Notify::new()));
    }

    /// Let one held call finish.
    pub async fn release(&self) {
        if let Some(gate) = self.gate.read().await.as_ref() {
            gate.notify_one();
        }
    }

    /// Resolves once a call has been recorded.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }
}

#[async_trait]
impl AuthClient for MockAuthClient {
    async fn check_auth(
        &self,
        base_url: &str,
        topic: &str,
        user: Option<&Credential>,
    ) -> CoreResult<bool> {
        self.calls.write().await.push(CheckCall {
            base_url: base_url.to_string(),
            topic: topic.to_string(),
            username: user.map(|u| u.username.clone()),
        });
        self.started.notify_one();

        let gate = self.gate.read().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.results.write().await.pop_front().unwrap_or(Ok(true))
    }
}

/// Connection-level failure as produced by the HTTP client
pub fn connection_error(detail: &str) -> CoreError {
    CoreError::Connection(ClientError::Network {
        detail: detail.to_string(),
    })
}

// ===== GatedStore =====

/// In-memory store whose subscription lookups for one topic block until
/// `release` is called. User lookups can be made to fail.
pub struct GatedStore {
    inner: InMemorySubscriptionStore,
    held_topic: RwLock<Option<String>>,
    gate: Notify,
    broken_users: RwLock<bool>,
}

impl GatedStore {
    pub fn new() -> Self {
        Self {
            inner: InMemorySubscriptionStore::new(),
            held_topic: RwLock::new(None),
            gate: Notify::new(),
            broken_users: RwLock::new(false),
        }
    }

    pub async fn break_user_lookups(&self) {
        *self.broken_users.write().await = true;
    }

    pub async fn hold_topic(&self, topic: &str) {
        *self.held_topic.write().await = Some(topic.to_string());
    }

    pub async fn release(&self) {
        *self.held_topic.write().await = None;
        self.gate.notify_waiters();
    }
}

#[async_trait]
impl SubscriptionStore for GatedStore {
    async fn get_user(&self, base_url: &str) -> CoreResult<Option<Credential>> {
        if *self.broken_users.read().await {
            return Err(CoreError::StorageError("user table unavailable".into()));
        }
        self.inner.get_user(base_url).await
    }

    async fn add_user(&self, user: &Credential) -> CoreResult<()> {
        self.inner.add_user(user).await
    }

    async fn get_subscription(
        &self,
        base_url: &str,
        topic: &str,
    ) -> CoreResult<Option<Subscription>> {
        let notified = self.gate.notified();
        let held = self.held_topic.read().await.as_deref() == Some(topic);
        if held {
            notified.await;
        }
        self.inner.get_subscription(base_url, topic).await
    }

    async fn add_subscription(&self, subscription: &Subscription) -> CoreResult<()> {
        self.inner.add_subscription(subscription).await
    }

    async fn get_default_base_url(&self) -> CoreResult<Option<String>> {
        self.inner.get_default_base_url().await
    }
}

// ===== RecordingListener =====

/// Recorded `on_subscribe` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeCall {
    pub topic: String,
    pub base_url: String,
    pub instant: bool,
}

pub struct RecordingListener {
    subscribed: Mutex<Vec<SubscribeCall>>,
    scans_accepted: Mutex<usize>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self {
            subscribed: Mutex::new(Vec::new()),
            scans_accepted: Mutex::new(0),
        }
    }

    pub fn subscribed(&self) -> Vec<SubscribeCall> {
        self.subscribed.lock().unwrap().clone()
    }

    pub fn scans_accepted(&self) -> usize {
        *self.scans_accepted.lock().unwrap()
    }
}

impl SubscribeListener for RecordingListener {
    fn on_subscribe(&self, topic: &str, base_url: &str, instant: bool) {
        self.subscribed.lock().unwrap().push(SubscribeCall {
            topic: topic.to_string(),
            base_url: base_url.to_string(),
            instant,
        });
    }

    fn on_scan_accepted(&self) {
        *self.scans_accepted.lock().unwrap() += 1;
    }
}

// ===== FixedScanner =====

/// Decodes every frame whose first byte is non-zero to a fixed payload.
pub struct FixedScanner {
    pub payload: String,
}

impl QrScanner for FixedScanner {
    fn decode(&mut self, frame: &LumaFrame) -> Option<String> {
        (frame.data.first().copied().unwrap_or(0) != 0).then(|| self.payload.clone())
    }
}

/// A 1x1 frame the `FixedScanner` decodes (`hit = true`) or ignores.
pub fn test_frame(hit: bool) -> LumaFrame {
    LumaFrame {
        width: 1,
        height: 1,
        data: vec![u8::from(hit)],
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `ServiceContext`
pub fn create_test_context() -> (
    Arc<ServiceContext>,
    Arc<MockAuthClient>,
    Arc<InMemorySubscriptionStore>,
) {
    let client = Arc::new(MockAuthClient::new());
    let store = Arc::new(InMemorySubscriptionStore::new());
    let ctx = Arc::new(ServiceContext::new(client.clone(), store.clone()));
    (ctx, client, store)
}
