//! Shared test utilities for the filmframe test suite.
//!
//! Provides synthetic rasters, a fixed-advance text renderer, a fixed palette
//! and a cube-file writer, so filter and layout tests never depend on fonts
//! or photos on disk.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let text = MonoText::default();
//! assert_eq!(text.measure("abcd", 10.0), 20);
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = write_identity_cube(tmp.path(), "id.cube", 2);
//! ```

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::imaging::{PaletteExtractor, TextRenderer};

// =========================================================================
// Rasters
// =========================================================================

pub fn uniform(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

/// A smooth ramp touching every channel, handy for checking that a transform
/// actually moved pixels.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let fx = x as f32 / width.saturating_sub(1).max(1) as f32;
        let fy = y as f32 / height.saturating_sub(1).max(1) as f32;
        Rgb([
            (fx * 255.0).round() as u8,
            (fy * 255.0).round() as u8,
            ((1.0 - fx) * 200.0 + 20.0).round() as u8,
        ])
    })
}

/// Largest per-channel difference between two same-sized images.
pub fn max_channel_diff(a: &RgbImage, b: &RgbImage) -> u8 {
    assert_eq!(a.dimensions(), b.dimensions(), "image sizes differ");
    a.as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}

// =========================================================================
// Text and palette stand-ins
// =========================================================================

/// Text renderer where every character advances half the font size.
///
/// Draw calls are recorded instead of rasterized; tests read them back with
/// [`MonoText::drawn`].
#[derive(Default)]
pub struct MonoText {
    calls: Mutex<Vec<(String, (i32, i32))>>,
}

impl MonoText {
    pub fn drawn(&self) -> Vec<(String, (i32, i32))> {
        self.calls.lock().unwrap().clone()
    }
}

impl TextRenderer for MonoText {
    fn measure(&self, text: &str, px: f32) -> u32 {
        (text.chars().count() as f32 * px * 0.5) as u32
    }

    fn draw(&self, _canvas: &mut RgbImage, text: &str, origin: (i32, i32), _px: f32, _color: Rgb<u8>) {
        self.calls.lock().unwrap().push((text.to_string(), origin));
    }
}

/// Palette that always answers with the same colors, cycled to `count`.
pub struct FixedPalette(pub Vec<Rgb<u8>>);

impl Default for FixedPalette {
    fn default() -> Self {
        Self(vec![
            Rgb([200, 40, 40]),
            Rgb([40, 200, 40]),
            Rgb([40, 40, 200]),
            Rgb([220, 220, 40]),
        ])
    }
}

impl PaletteExtractor for FixedPalette {
    fn dominant_colors(&self, _image: &RgbImage, count: usize) -> Vec<Rgb<u8>> {
        self.0.iter().cycle().take(count).copied().collect()
    }
}

// =========================================================================
// Cube files
// =========================================================================

/// Write a cube file with the given header lines followed by `rows`.
pub fn write_cube(dir: &Path, name: &str, header: &str, rows: &[[f32; 3]]) -> PathBuf {
    let mut body = String::from(header);
    if !body.ends_with('\n') {
        body.push('\n');
    }
    for row in rows {
        body.push_str(&format!("{:.6} {:.6} {:.6}\n", row[0], row[1], row[2]));
    }
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

/// Rows of an identity grid in file order (red fastest).
pub fn identity_rows(size: usize) -> Vec<[f32; 3]> {
    let step = |i: usize| i as f32 / (size - 1) as f32;
    let mut rows = Vec::with_capacity(size * size * size);
    for b in 0..size {
        for g in 0..size {
            for r in 0..size {
                rows.push([step(r), step(g), step(b)]);
            }
        }
    }
    rows
}

pub fn write_identity_cube(dir: &Path, name: &str, size: usize) -> PathBuf {
    write_cube(
        dir,
        name,
        &format!("TITLE \"identity\"\nLUT_3D_SIZE {size}\n"),
        &identity_rows(size),
    )
}
