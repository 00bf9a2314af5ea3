//! Raster plumbing shared by filters and layouts.
//!
//! | Concern | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` (JPEG, PNG, TIFF, WebP in; JPEG, PNG out) |
//! | **EXIF block** | `kamadak-exif` |
//! | **Resize / rotate / paste** | `image::imageops` |
//! | **Caption text** | `ab_glyph` + `imageproc::drawing` |
//! | **Swatch colors** | k-means over a downsample |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for layout math (unit testable)
//! - **Parameters**: Data structures describing what to write
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Buffer-level helpers the layouts compose
//! - **Text / Palette**: Seams for font rendering and dominant colors

pub mod backend;
pub mod calculations;
pub mod operations;
pub mod palette;
mod params;
pub mod rust_backend;
pub mod text;

pub use backend::{BackendError, ImageBackend, Photo};
pub use palette::{KMeansPalette, PaletteExtractor};
pub use params::{Quality, SaveParams};
pub use rust_backend::RustBackend;
pub use text::{FontRenderer, TextRenderer};
