//! Shared types.

use serde::{Deserialize, Serialize};

/// Per-server login.
///
/// A credential belongs to exactly one base URL. `Debug` never prints the
/// password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Server the credential belongs to.
    pub base_url: String,
    /// Login name.
    pub username: String,
    /// Password (plain text, as sent in the Basic auth header).
    pub password: String,
}

impl Credential {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// `{base_url}/{topic}`, used in log lines and user-facing text.
pub fn topic_url(base_url: &str, topic: &str) -> String {
    format!("{}/{topic}", base_url.trim_end_matches('/'))
}

/// `{base_url}/{topic}/auth`, the read-access check endpoint.
pub fn topic_auth_url(base_url: &str, topic: &str) -> String {
    format!("{}/auth", topic_url(base_url, topic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_password() {
        let c = Credential::new("https://ntfy.sh", "phil", "hunter2");
        let dbg = format!("{c:?}");
        assert!(dbg.contains("phil"));
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn auth_url_trims_trailing_slash() {
        assert_eq!(
            topic_auth_url("https://ntfy.sh/", "alerts"),
            "https://ntfy.sh/alerts/auth"
        );
        assert_eq!(topic_url("https://ntfy.sh", "alerts"), "https://ntfy.sh/alerts");
    }

    #[test]
    fn serde_uses_camel_case() {
        let c = Credential::new("https://a.b", "u", "p");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["baseUrl"], "https://a.b");
    }
}
