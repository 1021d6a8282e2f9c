//! Platform-agnostic application bootstrap for the scan-to-subscribe dialog.
//!
//! Provides `AppConfig` (file configuration), `AppState` (service container)
//! and `AppStateBuilder` (adapter injection).

pub mod adapters;
mod config;

use std::sync::Arc;

pub use config::AppConfig;

use qr_subscribe_client::AuthCheckClient;
use qr_subscribe_core::dialog::{DialogHandle, DialogOutcome, SubscribeDialog};
use qr_subscribe_core::error::CoreResult;
use qr_subscribe_core::services::ServiceContext;
use qr_subscribe_core::traits::{AuthClient, QrScanner, SubscribeListener, SubscriptionStore};
use qr_subscribe_core::types::Subscription;

use adapters::JsonFileStore;

/// Platform-agnostic application state.
///
/// Every frontend constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (auth client, store, delivery settings)
    pub ctx: Arc<ServiceContext>,
    /// Effective configuration
    pub config: AppConfig,
}

impl AppState {
    /// Open a subscribe dialog. `scanner` decodes raw camera frames.
    pub async fn open_dialog(
        &self,
        listener: Arc<dyn SubscribeListener>,
        scanner: Option<Box<dyn QrScanner>>,
    ) -> CoreResult<DialogHandle> {
        let mut builder = SubscribeDialog::builder(Arc::clone(&self.ctx), listener);
        if let Some(scanner) = scanner {
            builder = builder.with_scanner(scanner);
        }
        builder.open().await
    }

    /// Persist the subscription a completed dialog produced.
    ///
    /// Returns the stored subscription, or `None` for a cancelled dialog.
    pub async fn record_outcome(&self, outcome: &DialogOutcome) -> CoreResult<Option<Subscription>> {
        let DialogOutcome::Subscribed {
            topic,
            base_url,
            instant,
        } = outcome
        else {
            return Ok(None);
        };

        let subscription = Subscription {
            base_url: base_url.clone(),
            topic: topic.clone(),
            instant: *instant,
        };
        self.ctx.store().add_subscription(&subscription).await?;
        log::info!("Subscription saved: {topic} on {base_url}");
        Ok(Some(subscription))
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Optional
/// - `auth_client`: defaults to `AuthCheckClient` with the configured timeouts
/// - `store`: defaults to `JsonFileStore` at `AppConfig::store_path`
/// - `config`: defaults to `AppConfig::default()`
pub struct AppStateBuilder {
    config: AppConfig,
    auth_client: Option<Arc<dyn AuthClient>>,
    store: Option<Arc<dyn SubscriptionStore>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            auth_client: None,
            store: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn auth_client(mut self, client: Arc<dyn AuthClient>) -> Self {
        self.auth_client = Some(client);
        self
    }

    #[must_use]
    pub fn store(mut self, store: Arc<dyn SubscriptionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidInput` for an invalid configuration and
    /// `CoreError::Connection` when the HTTP client cannot be created.
    pub fn build(self) -> CoreResult<AppState> {
        self.config.validate()?;

        let auth_client: Arc<dyn AuthClient> = match self.auth_client {
            Some(client) => client,
            None => Arc::new(AuthCheckClient::with_options(self.config.client_options())?),
        };
        let store: Arc<dyn SubscriptionStore> = match self.store {
            Some(store) => store,
            None => {
                let path = self.config.store_path();
                log::debug!("Using subscription store {}", path.display());
                Arc::new(
                    JsonFileStore::new(path)
                        .with_default_base_url(self.config.default_base_url.clone()),
                )
            }
        };

        let ctx = ServiceContext::new(auth_client, store)
            .with_push_available(self.config.push_available)
            .with_app_base_url(self.config.app_base_url.clone());

        Ok(AppState {
            ctx: Arc::new(ctx),
            config: self.config,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
