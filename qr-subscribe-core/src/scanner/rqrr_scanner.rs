//! QR decoding with `rqrr`

use crate::traits::QrScanner;
use crate::types::LumaFrame;

/// [`QrScanner`] backed by the pure-Rust `rqrr` decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrScanner;

impl RqrrScanner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl QrScanner for RqrrScanner {
    fn decode(&mut self, frame: &LumaFrame) -> Option<String> {
        if frame.width == 0 || frame.height == 0 {
            return None;
        }
        let mut image =
            rqrr::PreparedImage::prepare_from_greyscale(frame.width, frame.height, |x, y| {
                frame.luma(x, y)
            });

        image.detect_grids().into_iter().find_map(|grid| {
            grid.decode()
                .inspect_err(|e| log::trace!("QR grid found but not decodable: {e}"))
                .ok()
                .map(|(_, content)| content)
        })
    }
}
