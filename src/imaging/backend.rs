//! Raster I/O backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three file-level operations the
//! pipeline needs: decode a photo (pixels plus its raw EXIF block), load a
//! logo, and encode a finished canvas.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): the `image` crate for
//! codecs and `kamadak-exif` for metadata extraction.

use super::params::SaveParams;
use image::{DynamicImage, RgbImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// A decoded photo.
///
/// `exif` holds the raw TIFF-structured EXIF block (not the whole file), as
/// produced by [`exif::Exif::buf`]. It is parsed lazily when a layout needs
/// caption text, so a corrupt block never blocks decoding.
#[derive(Debug, Clone)]
pub struct Photo {
    pub image: DynamicImage,
    pub exif: Option<Vec<u8>>,
}

impl Photo {
    pub fn new(image: DynamicImage) -> Self {
        Self { image, exif: None }
    }

    pub fn with_exif(mut self, raw: Vec<u8>) -> Self {
        self.exif = Some(raw);
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// Trait for raster I/O backends.
///
/// Every backend must implement decode, load_logo and save so layouts and the
/// CLI stay backend-agnostic.
pub trait ImageBackend: Sync {
    /// Decode a photo and capture its EXIF block if present.
    fn decode(&self, path: &Path) -> Result<Photo, BackendError>;

    /// Load a logo image, keeping its alpha channel.
    fn load_logo(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode a finished canvas.
    fn save(&self, image: &RgbImage, params: &SaveParams) -> Result<(), BackendError>;
}
