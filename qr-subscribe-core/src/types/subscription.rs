//! 订阅相关类型定义

use serde::{Deserialize, Serialize};

use qr_subscribe_client::Credential;

/// A (base URL, topic) pair the user is about to subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionTarget {
    pub base_url: String,
    pub topic: String,
}

impl SubscriptionTarget {
    pub fn new(base_url: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            topic: topic.into(),
        }
    }
}

/// An existing subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// 服务器地址
    pub base_url: String,
    /// 主题名称
    pub topic: String,
    /// 是否即时投递
    #[serde(default)]
    pub instant: bool,
}

impl Subscription {
    pub fn matches(&self, base_url: &str, topic: &str) -> bool {
        self.base_url == base_url && self.topic == topic
    }
}

/// Everything a subscription store persists.
///
/// Serialized as a single JSON document by file-backed stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_base_url: Option<String>,
    #[serde(default)]
    pub users: Vec<Credential>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl StoreSnapshot {
    pub fn user(&self, base_url: &str) -> Option<&Credential> {
        self.users.iter().find(|u| u.base_url == base_url)
    }

    /// Insert or replace the credential for `user.base_url`.
    pub fn upsert_user(&mut self, user: Credential) {
        self.users.retain(|u| u.base_url != user.base_url);
        self.users.push(user);
    }

    pub fn subscription(&self, base_url: &str, topic: &str) -> Option<&Subscription> {
        self.subscriptions
            .iter()
            .find(|s| s.matches(base_url, topic))
    }

    /// Insert or replace the subscription for (`base_url`, `topic`).
    pub fn upsert_subscription(&mut self, subscription: Subscription) {
        self.subscriptions
            .retain(|s| !s.matches(&subscription.base_url, &subscription.topic));
        self.subscriptions.push(subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_user_keeps_one_per_server() {
        let mut snap = StoreSnapshot::default();
        snap.upsert_user(Credential::new("https://a.example", "u1", "p1"));
        snap.upsert_user(Credential::new("https://a.example", "u2", "p2"));
        snap.upsert_user(Credential::new("https://b.example", "u3", "p3"));

        assert_eq!(snap.users.len(), 2);
        assert_eq!(snap.user("https://a.example").map(|u| u.username.as_str()), Some("u2"));
    }

    #[test]
    fn subscription_lookup_needs_both_fields() {
        let mut snap = StoreSnapshot::default();
        snap.upsert_subscription(Subscription {
            base_url: "https://ntfy.sh".into(),
            topic: "alerts".into(),
            instant: false,
        });

        assert!(snap.subscription("https://ntfy.sh", "alerts").is_some());
        assert!(snap.subscription("https://ntfy.sh", "other").is_none());
        assert!(snap.subscription("https://other.sh", "alerts").is_none());
    }

    #[test]
    fn snapshot_deserializes_from_empty_object() {
        let snap: StoreSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snap.users.is_empty());
        assert!(snap.default_base_url.is_none());
    }
}
