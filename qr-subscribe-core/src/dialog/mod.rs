//! Scan-to-subscribe dialog
//!
//! A single task owns [`DialogState`]. Frontends send [`DialogEvent`]s through
//! a [`DialogHandle`] and render the snapshots it publishes. Validation and
//! authorization checks run on spawned tasks and report back to the owner.

mod controller;
mod event;
mod seq;
mod state;

pub use controller::{DialogHandle, SubscribeDialog, SubscribeDialogBuilder};
pub use event::DialogEvent;
pub use seq::{Generation, ValidationSeq};
pub use state::{
    CameraState, DialogOutcome, DialogState, DialogView, Field, InstantDeliveryView, LoginForm,
    PageStatus, SubscribeForm,
};
