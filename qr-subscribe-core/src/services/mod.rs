//! 业务逻辑服务层

mod authorization_service;
mod validation_service;

pub use authorization_service::{AuthorizationService, SubscribeCheck};
pub use validation_service::{SubscribeInput, ValidationService};

use std::sync::Arc;

use crate::error::CoreResult;
use crate::traits::{AuthClient, SubscriptionStore};
use crate::types::{DeliverySettings, DEFAULT_APP_BASE_URL};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的实现。
pub struct ServiceContext {
    /// 授权检查客户端
    auth_client: Arc<dyn AuthClient>,
    /// 订阅/用户存储
    store: Arc<dyn SubscriptionStore>,
    /// 构建是否支持推送
    push_available: bool,
    /// 应用内置服务器
    app_base_url: String,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(auth_client: Arc<dyn AuthClient>, store: Arc<dyn SubscriptionStore>) -> Self {
        Self {
            auth_client,
            store,
            push_available: true,
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_push_available(mut self, push_available: bool) -> Self {
        self.push_available = push_available;
        self
    }

    #[must_use]
    pub fn with_app_base_url(mut self, app_base_url: impl Into<String>) -> Self {
        self.app_base_url = app_base_url.into();
        self
    }

    pub fn auth_client(&self) -> &Arc<dyn AuthClient> {
        &self.auth_client
    }

    pub fn store(&self) -> &Arc<dyn SubscriptionStore> {
        &self.store
    }

    pub fn push_available(&self) -> bool {
        self.push_available
    }

    pub fn app_base_url(&self) -> &str {
        &self.app_base_url
    }

    /// 读取存储中的默认服务器，组合出投递设置
    pub async fn delivery_settings(&self) -> CoreResult<DeliverySettings> {
        let default_base_url = self.store.get_default_base_url().await?;
        Ok(DeliverySettings {
            push_available: self.push_available,
            app_base_url: self.app_base_url.clone(),
            default_base_url,
        })
    }
}
