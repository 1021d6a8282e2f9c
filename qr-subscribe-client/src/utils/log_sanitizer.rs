//! Log sanitization utilities
//!
//! Keeps response bodies and secrets out of debug/error logs.

/// Maximum number of bytes of a response body included in a log line.
const TRUNCATE_LIMIT: usize = 200;

/// Truncate a string for safe logging.
///
/// Cuts at a char boundary at or below `TRUNCATE_LIMIT` and appends the total
/// length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let mut end = TRUNCATE_LIMIT;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..end], s.len())
}

/// Replace a secret with a fixed-width mask, keeping only whether it was empty.
pub fn mask_secret(secret: &str) -> &'static str {
    if secret.is_empty() { "<empty>" } else { "***" }
}
