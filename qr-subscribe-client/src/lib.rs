//! # qr-subscribe-client
//!
//! Read-access check against a notification topic server.
//!
//! The server exposes `GET {base_url}/{topic}/auth`. The request carries HTTP
//! Basic credentials when a [`Credential`] is supplied.
//!
//! | Status | Result |
//! |--------|--------|
//! | 2xx | `Ok(true)` |
//! | 401 / 403 | `Ok(false)` |
//! | anything else | `Err(ClientError::UnexpectedStatus)` |
//!
//! Transport failures (DNS, refused connection, timeout) surface as
//! [`ClientError::Network`] / [`ClientError::Timeout`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use qr_subscribe_client::{AuthCheckClient, Credential};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AuthCheckClient::new()?;
//!
//!     // Anonymous check
//!     let open = client.check_auth("https://ntfy.sh", "alerts", None).await?;
//!
//!     // Check with credentials
//!     let user = Credential::new("https://ntfy.example.com", "phil", "secret");
//!     let allowed = client
//!         .check_auth("https://ntfy.example.com", "alerts", Some(&user))
//!         .await?;
//!
//!     println!("anonymous={open} phil={allowed}");
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod http_client;
mod types;
mod utils;

pub use client::{AuthCheckClient, ClientOptions};
pub use error::{ClientError, Result};
pub use types::{Credential, topic_auth_url, topic_url};
pub use utils::log_sanitizer::truncate_for_log;
