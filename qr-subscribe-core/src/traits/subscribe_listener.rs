//! Dialog host callbacks

/// Receives the result of a completed dialog.
///
/// Called on the dialog task; implementations must not block.
pub trait SubscribeListener: Send + Sync {
    /// Invoked exactly once when the dialog completes successfully.
    fn on_subscribe(&self, topic: &str, base_url: &str, instant: bool);

    /// A scanned code filled the form and is being submitted (haptic cue).
    fn on_scan_accepted(&self) {}
}
