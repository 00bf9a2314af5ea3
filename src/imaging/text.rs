//! Caption text measuring and drawing.
//!
//! Layouts only ever need two things from a font: how wide a string is at a
//! given pixel size, and drawing it at a position. [`TextRenderer`] is that
//! seam; [`FontRenderer`] implements it with `ab_glyph` outlines rasterized
//! by `imageproc`.

use super::backend::BackendError;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

pub trait TextRenderer: Sync {
    /// Advance width of `text` in pixels at font size `px`.
    fn measure(&self, text: &str, px: f32) -> u32;

    /// Draw `text` with its top-left corner at `origin`.
    fn draw(&self, canvas: &mut RgbImage, text: &str, origin: (i32, i32), px: f32, color: Rgb<u8>);
}

/// Draw text four times with one-pixel offsets to fake a bold weight.
pub fn draw_bold<R: TextRenderer + ?Sized>(
    renderer: &R,
    canvas: &mut RgbImage,
    text: &str,
    origin: (i32, i32),
    px: f32,
    color: Rgb<u8>,
) {
    for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        renderer.draw(canvas, text, (origin.0 + dx, origin.1 + dy), px, color);
    }
}

/// A TrueType/OpenType font loaded into memory.
pub struct FontRenderer {
    font: FontVec,
}

impl FontRenderer {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, BackendError> {
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| BackendError::ProcessingFailed(format!("Invalid font data: {e}")))?;
        Ok(Self { font })
    }

    pub fn from_file(path: &Path) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes).map_err(|e| match e {
            BackendError::ProcessingFailed(msg) => {
                BackendError::ProcessingFailed(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }
}

impl TextRenderer for FontRenderer {
    fn measure(&self, text: &str, px: f32) -> u32 {
        if text.is_empty() {
            return 0;
        }
        text_size(PxScale::from(px), &self.font, text).0
    }

    fn draw(&self, canvas: &mut RgbImage, text: &str, origin: (i32, i32), px: f32, color: Rgb<u8>) {
        if text.is_empty() {
            return;
        }
        draw_text_mut(
            canvas,
            color,
            origin.0,
            origin.1,
            PxScale::from(px),
            &self.font,
            text,
        );
    }
}
