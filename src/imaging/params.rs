//! Parameter types for raster I/O.
//!
//! These structs describe *what* to write, not *how*. The
//! [`backend`](super::backend) decides which encoder handles a given path.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`SaveParams`]: Output path plus quality for a finished canvas.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Where and how to encode a composed canvas.
///
/// The format is inferred from the extension of `output`; `quality` only
/// applies to lossy formats (JPEG).
#[derive(Debug, Clone, PartialEq)]
pub struct SaveParams {
    pub output: PathBuf,
    pub quality: Quality,
}
