//! Collaborator abstraction trait definition

mod auth_client;
mod qr_scanner;
mod subscribe_listener;
mod subscription_store;

pub use auth_client::AuthClient;
pub use qr_scanner::QrScanner;
pub use subscribe_listener::SubscribeListener;
pub use subscription_store::{InMemorySubscriptionStore, SubscriptionStore};
