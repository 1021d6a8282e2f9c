//! Subscribe-page validation query
//!
//! Combines the pure input rules with the store lookup for an existing
//! subscription. Runs off the dialog task; callers sequence results.

use std::sync::Arc;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::validation::{is_reserved_topic, subscribe_input_valid, valid_topic};

/// Snapshot of the subscribe form taken when validation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeInput {
    pub topic: String,
    /// Effective base URL (already resolved from the form and settings).
    pub base_url: String,
    pub use_another_server: bool,
}

pub struct ValidationService {
    ctx: Arc<ServiceContext>,
}

impl ValidationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Whether the subscribe page may submit `input`.
    pub async fn validate_subscribe(&self, input: &SubscribeInput) -> CoreResult<bool> {
        // 无效主题无需查询存储
        if !valid_topic(&input.topic) || is_reserved_topic(&input.topic) {
            return Ok(false);
        }

        let existing = self
            .ctx
            .store()
            .get_subscription(&input.base_url, &input.topic)
            .await?;

        Ok(subscribe_input_valid(
            &input.topic,
            &input.base_url,
            input.use_another_server,
            existing.is_some(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_context;
    use crate::traits::SubscriptionStore;
    use crate::types::Subscription;

    fn input(topic: &str, base_url: &str, use_another_server: bool) -> SubscribeInput {
        SubscribeInput {
            topic: topic.into(),
            base_url: base_url.into(),
            use_another_server,
        }
    }

    #[tokio::test]
    async fn valid_new_topic() {
        let (ctx, _, _) = create_test_context();
        let svc = ValidationService::new(ctx);
        assert!(svc
            .validate_subscribe(&input("alerts", "https://ntfy.sh", false))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn existing_subscription_is_invalid() {
        let (ctx, _, store) = create_test_context();
        store
            .add_subscription(&Subscription {
                base_url: "https://ntfy.sh".into(),
                topic: "alerts".into(),
                instant: false,
            })
            .await
            .unwrap();

        let svc = ValidationService::new(ctx);
        assert!(!svc
            .validate_subscribe(&input("alerts", "https://ntfy.sh", false))
            .await
            .unwrap());
        // Same topic on another server is fine
        assert!(svc
            .validate_subscribe(&input("alerts", "https://self.hosted", true))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn reserved_topics_are_invalid() {
        let (ctx, _, _) = create_test_context();
        let svc = ValidationService::new(ctx);
        for topic in crate::validation::DISALLOWED_TOPICS {
            assert!(!svc
                .validate_subscribe(&input(topic, "https://ntfy.sh", false))
                .await
                .unwrap());
        }
    }

    #[tokio::test]
    async fn bad_custom_url_is_invalid() {
        let (ctx, _, _) = create_test_context();
        let svc = ValidationService::new(ctx);
        assert!(!svc
            .validate_subscribe(&input("alerts", "self.hosted", true))
            .await
            .unwrap());
    }
}
