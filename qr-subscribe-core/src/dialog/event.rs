//! 对话框事件

use crate::error::CoreResult;
use crate::services::SubscribeCheck;
use crate::types::LumaFrame;

use super::seq::Generation;

/// User and camera input delivered to the dialog
#[derive(Debug, Clone)]
pub enum DialogEvent {
    TopicChanged(String),
    BaseUrlChanged(String),
    UseAnotherServerToggled(bool),
    InstantDeliveryToggled(bool),
    UsernameChanged(String),
    PasswordChanged(String),
    PositiveClicked,
    NegativeClicked,
    /// Dismissed from outside (back gesture, host closing the window)
    Cancel,
    /// Result of the camera permission prompt
    CameraPermission { granted: bool },
    /// A decoded QR payload (frontends with their own decoder)
    QrScanned(String),
    /// A raw camera frame for the built-in scanner
    Frame(LumaFrame),
}

/// Everything the dialog task consumes: user events and completions of the
/// work it spawned.
#[derive(Debug)]
pub(crate) enum Message {
    Event(DialogEvent),
    Validated {
        generation: Generation,
        result: CoreResult<bool>,
    },
    SubscribeChecked {
        topic: String,
        base_url: String,
        result: CoreResult<SubscribeCheck>,
    },
    LoginChecked {
        topic: String,
        base_url: String,
        result: CoreResult<()>,
    },
}

impl From<DialogEvent> for Message {
    fn from(event: DialogEvent) -> Self {
        Self::Event(event)
    }
}
