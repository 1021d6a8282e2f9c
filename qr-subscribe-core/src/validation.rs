//! Input validation rules for the subscribe and login pages

use std::sync::LazyLock;

use regex::Regex;

/// Topic names the server reserves for its own routes.
///
/// If updated, also update in server.
pub const DISALLOWED_TOPICS: [&str; 3] = ["docs", "static", "file"];

static TOPIC_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[-_A-Za-z0-9]{1,64}$").ok());

static URL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").ok());

/// 1 to 64 characters of `[-_A-Za-z0-9]`.
pub fn valid_topic(topic: &str) -> bool {
    TOPIC_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(topic))
}

/// `http://` or `https://` followed by at least one non-whitespace character.
pub fn valid_url(url: &str) -> bool {
    URL_PATTERN.as_ref().is_some_and(|re| re.is_match(url))
}

pub fn is_reserved_topic(topic: &str) -> bool {
    DISALLOWED_TOPICS.contains(&topic)
}

/// Whether the subscribe page may submit.
///
/// `already_subscribed` comes from the store lookup for the effective
/// (base URL, topic).
pub fn subscribe_input_valid(
    topic: &str,
    base_url: &str,
    use_another_server: bool,
    already_subscribed: bool,
) -> bool {
    if already_subscribed || is_reserved_topic(topic) {
        return false;
    }
    if use_another_server {
        valid_topic(topic) && valid_url(base_url)
    } else {
        valid_topic(topic)
    }
}

/// Whether the login page may submit.
pub fn login_input_valid(username: &str, password: &str) -> bool {
    !username.is_empty() && !password.is_empty()
}
