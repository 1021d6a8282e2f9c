//! Instant-delivery settings

use serde::{Deserialize, Serialize};

/// Server the app talks to when nothing else is configured.
pub const DEFAULT_APP_BASE_URL: &str = "https://ntfy.sh";

/// Inputs to the instant-delivery decision and to base URL resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySettings {
    /// Whether this build can receive push notifications through a relay.
    pub push_available: bool,
    /// Built-in server of the app.
    pub app_base_url: String,
    /// User-configured default server, if any (read from the store).
    pub default_base_url: Option<String>,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            push_available: true,
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
            default_base_url: None,
        }
    }
}

impl DeliverySettings {
    /// The "instant delivery" checkbox is only offered when push is available
    /// and no server default is configured.
    pub fn instant_toggle_allowed(&self) -> bool {
        self.push_available && self.default_base_url.is_none()
    }

    /// `!push_available || base_url != app_base_url || checked`
    pub fn is_instant(&self, base_url: &str, checked: bool) -> bool {
        !self.push_available || base_url != self.app_base_url || checked
    }

    /// Base URL the dialog subscribes against.
    ///
    /// The typed server URL wins when "use another server" is on; otherwise
    /// the configured default, then the app's built-in server.
    pub fn effective_base_url(&self, use_another_server: bool, typed_base_url: &str) -> String {
        if use_another_server {
            typed_base_url.to_string()
        } else {
            self.default_base_url
                .clone()
                .unwrap_or_else(|| self.app_base_url.clone())
        }
    }
}
