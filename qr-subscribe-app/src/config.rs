//! Application configuration
//!
//! Read from `<config dir>/qr-subscribe/config.json`. A missing file yields
//! the defaults; a malformed one is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use qr_subscribe_client::ClientOptions;
use qr_subscribe_core::error::{CoreError, CoreResult};
use qr_subscribe_core::types::DEFAULT_APP_BASE_URL;
use qr_subscribe_core::validation::valid_url;

const CONFIG_DIR_NAME: &str = "qr-subscribe";
const CONFIG_FILE_NAME: &str = "config.json";
const STORE_FILE_NAME: &str = "store.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Built-in server of the app
    pub app_base_url: String,
    /// User-configured default server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_base_url: Option<String>,
    /// Whether push delivery is available in this build
    pub push_available: bool,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Subscription store location, defaults to `store.json` next to the config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientOptions::default();
        Self {
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
            default_base_url: None,
            push_available: true,
            request_timeout_secs: client.request_timeout.as_secs(),
            connect_timeout_secs: client.connect_timeout.as_secs(),
            store_path: None,
        }
    }
}

impl AppConfig {
    /// 获取配置目录路径
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    pub async fn load(path: &Path) -> CoreResult<Self> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            log::debug!("Config file not found, using defaults: {}", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to read config: {e}")))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            CoreError::SerializationError(format!("Invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| CoreError::StorageError(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| CoreError::StorageError(e.to_string()))
    }

    /// Reject server URLs the dialog could never use.
    pub fn validate(&self) -> CoreResult<()> {
        if !valid_url(&self.app_base_url) {
            return Err(CoreError::InvalidInput(format!(
                "app_base_url is not a valid URL: {}",
                self.app_base_url
            )));
        }
        if let Some(url) = self.default_base_url.as_deref().filter(|u| !valid_url(u)) {
            return Err(CoreError::InvalidInput(format!(
                "default_base_url is not a valid URL: {url}"
            )));
        }
        Ok(())
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join(STORE_FILE_NAME))
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
