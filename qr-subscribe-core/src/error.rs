//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use qr_subscribe_client::ClientError;

/// Core layer error type
///
/// `Display` is the exact text shown in a dialog error slot.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The server refused read access for this user
    #[error("Login failed. User {0} not authorized.")]
    NotAuthorized(String),

    /// Connection or protocol failure talking to the server (raw message)
    #[error("{0}")]
    Connection(#[from] ClientError),

    /// Input that should have been blocked by button disablement
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Scanned QR code does not encode a topic URL
    #[error("Invalid QR code: {0}")]
    InvalidQrPayload(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The QR analyzer thread could not be started
    #[error("Scanner error: {0}")]
    ScannerError(String),

    /// The dialog was closed before the operation finished
    #[error("Dialog closed")]
    DialogClosed,
}

impl CoreError {
    /// Whether it is expected behavior (user input, refused access, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NotAuthorized(_)
            | Self::InvalidInput(_)
            | Self::InvalidQrPayload(_)
            | Self::DialogClosed => true,
            Self::Connection(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
