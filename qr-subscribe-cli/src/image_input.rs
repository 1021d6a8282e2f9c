//! Image files as camera frames

use std::path::Path;

use anyhow::{Context, Result};
use qr_subscribe_core::types::LumaFrame;

/// Decode an image file into a greyscale frame.
pub fn load_frame(path: &Path) -> Result<LumaFrame> {
    let image = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .to_luma8();
    let (width, height) = image.dimensions();

    LumaFrame::new(width as usize, height as usize, image.into_raw())
        .context("Image buffer does not match its dimensions")
}
