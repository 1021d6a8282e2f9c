//! QR payload contract
//!
//! A scanned code must be a topic URL such as `https://ntfy.sh/alerts`.
//! Scheme and host (plus a non-default port) form the base URL; the path
//! without its leading slash is the topic.

use url::Url;

use crate::error::{CoreError, CoreResult};
use crate::types::SubscriptionTarget;

/// Parse a decoded QR string into a subscription target.
///
/// The topic is not validated here; the dialog's validation decides whether
/// the result can be submitted.
pub fn parse_qr_payload(payload: &str) -> CoreResult<SubscriptionTarget> {
    let url = Url::parse(payload.trim())
        .map_err(|e| CoreError::InvalidQrPayload(format!("{payload}: {e}")))?;

    let host = url
        .host_str()
        .ok_or_else(|| CoreError::InvalidQrPayload(format!("{payload}: missing host")))?;

    let base_url = match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    };
    let topic = url.path().strip_prefix('/').unwrap_or(url.path());

    Ok(SubscriptionTarget::new(base_url, topic))
}
