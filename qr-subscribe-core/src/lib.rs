//! QR Subscribe Core Library
//!
//! Core logic of the scan-to-subscribe dialog:
//! - Input validation (topic names, server URLs, reserved topics)
//! - Authorization flow (anonymous check, login prompt, credential persistence)
//! - Two-page dialog state machine driven by a single-writer task
//! - QR payload parsing and the frame analyzer thread
//!
//! The library is frontend-independent. Storage, the HTTP check and the host
//! callback are injected through traits.

pub mod dialog;
pub mod error;
pub mod qr;
pub mod scanner;
pub mod services;
pub mod traits;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use dialog::{DialogEvent, DialogHandle, DialogOutcome, DialogState, SubscribeDialog};
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{AuthClient, InMemorySubscriptionStore, QrScanner, SubscribeListener, SubscriptionStore};
