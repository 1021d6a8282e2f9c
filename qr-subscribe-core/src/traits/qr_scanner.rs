//! QR decoding abstract Trait

use crate::types::LumaFrame;

/// Decodes camera frames into text payloads.
///
/// Runs on the dedicated analyzer thread, one frame at a time.
pub trait QrScanner: Send + 'static {
    /// First decodable payload in `frame`, if any.
    fn decode(&mut self, frame: &LumaFrame) -> Option<String>;
}
