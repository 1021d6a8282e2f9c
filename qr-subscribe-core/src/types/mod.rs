//! 类型定义模块

mod frame;
mod settings;
mod subscription;

pub use frame::LumaFrame;
pub use settings::{DeliverySettings, DEFAULT_APP_BASE_URL};
pub use subscription::{StoreSnapshot, Subscription, SubscriptionTarget};

// Re-export client 库的公共类型
pub use qr_subscribe_client::{topic_url, Credential};
