//! JSON file-based subscription store.
//!
//! Keeps users and subscriptions in a single JSON document. The document is
//! cached after the first read; every write replaces the file atomically
//! (temp file + rename) on the blocking pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use qr_subscribe_core::error::{CoreError, CoreResult};
use qr_subscribe_core::traits::SubscriptionStore;
use qr_subscribe_core::types::{Credential, StoreSnapshot, Subscription};

/// 存储文件大小上限
const MAX_STORE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Subscription store backed by one JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    cache: Arc<RwLock<Option<StoreSnapshot>>>,
    /// Configured default server, takes precedence over the file's value
    default_base_url: Option<String>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Arc::new(RwLock::new(None)),
            default_base_url: None,
        }
    }

    #[must_use]
    pub fn with_default_base_url(mut self, default_base_url: Option<String>) -> Self {
        self.default_base_url = default_base_url;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_sync(path: &Path) -> CoreResult<StoreSnapshot> {
        if !path.exists() {
            log::debug!("Store file does not exist: {}", path.display());
            return Ok(StoreSnapshot::default());
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| CoreError::StorageError(format!("Failed to read store metadata: {e}")))?;
        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Store file too large: {} bytes (max: {MAX_STORE_FILE_SIZE} bytes)",
                metadata.len()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::StorageError(format!("Failed to read store file: {e}")))?;
        if content.trim().is_empty() {
            return Ok(StoreSnapshot::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| CoreError::SerializationError(format!("Invalid store format: {e}")))
    }

    fn write_sync(path: &Path, snapshot: &StoreSnapshot) -> CoreResult<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| CoreError::StorageError(format!("Failed to create store dir: {e}")))?;
        }

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| CoreError::StorageError(format!("Failed to write store file: {e}")))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| CoreError::StorageError(format!("Failed to replace store file: {e}")))
    }

    /// Run `lookup` against the cached document, loading it on first use.
    async fn read<T>(&self, lookup: impl FnOnce(&StoreSnapshot) -> T) -> CoreResult<T> {
        {
            let cache = self.cache.read().await;
            if let Some(ref snapshot) = *cache {
                return Ok(lookup(snapshot));
            }
        }

        let mut cache = self.cache.write().await;
        if let Some(ref snapshot) = *cache {
            return Ok(lookup(snapshot));
        }

        let path = self.path.clone();
        let snapshot = tokio::task::spawn_blocking(move || Self::read_sync(&path))
            .await
            .map_err(|e| CoreError::StorageError(format!("Task join error: {e}")))??;

        log::info!(
            "Loaded {} subscriptions and {} users from {}",
            snapshot.subscriptions.len(),
            snapshot.users.len(),
            self.path.display()
        );
        Ok(lookup(cache.insert(snapshot)))
    }

    /// Apply `change` to the document and persist it. The cache only moves
    /// forward once the file is written.
    async fn update(&self, change: impl FnOnce(&mut StoreSnapshot)) -> CoreResult<()> {
        let mut cache = self.cache.write().await;

        let mut snapshot = match cache.as_ref() {
            Some(snapshot) => snapshot.clone(),
            None => {
                let path = self.path.clone();
                tokio::task::spawn_blocking(move || Self::read_sync(&path))
                    .await
                    .map_err(|e| CoreError::StorageError(format!("Task join error: {e}")))??
            }
        };
        change(&mut snapshot);

        let path = self.path.clone();
        let to_write = snapshot.clone();
        tokio::task::spawn_blocking(move || Self::write_sync(&path, &to_write))
            .await
            .map_err(|e| CoreError::StorageError(format!("Task join error: {e}")))??;

        *cache = Some(snapshot);
        Ok(())
    }
}

#[async_trait]
impl SubscriptionStore for JsonFileStore {
    async fn get_user(&self, base_url: &str) -> CoreResult<Option<Credential>> {
        self.read(|snapshot| snapshot.user(base_url).cloned()).await
    }

    async fn add_user(&self, user: &Credential) -> CoreResult<()> {
        let user = user.clone();
        log::debug!("Saving user {} for {}", user.username, user.base_url);
        self.update(|snapshot| snapshot.upsert_user(user)).await
    }

    async fn get_subscription(
        &self,
        base_url: &str,
        topic: &str,
    ) -> CoreResult<Option<Subscription>> {
        self.read(|snapshot| snapshot.subscription(base_url, topic).cloned())
            .await
    }

    async fn add_subscription(&self, subscription: &Subscription) -> CoreResult<()> {
        let subscription = subscription.clone();
        log::debug!(
            "Saving subscription {} on {}",
            subscription.topic,
            subscription.base_url
        );
        self.update(|snapshot| snapshot.upsert_subscription(subscription))
            .await
    }

    async fn get_default_base_url(&self) -> CoreResult<Option<String>> {
        if self.default_base_url.is_some() {
            return Ok(self.default_base_url.clone());
        }
        self.read(|snapshot| snapshot.default_base_url.clone()).await
    }
}
