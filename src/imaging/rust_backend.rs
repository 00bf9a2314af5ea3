//! Pure Rust raster backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with format sniffing |
//! | EXIF block | `kamadak-exif` `Reader::read_from_container` |
//! | Logo load | `image` (alpha preserved) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |

use super::backend::{BackendError, ImageBackend, Photo};
use super::params::SaveParams;
use image::{DynamicImage, ImageEncoder, ImageFormat, ImageReader, RgbImage};
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_bytes(bytes: &[u8], path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Pull the raw EXIF block out of a container. Absence is normal (PNG
/// exports, screenshots) and not an error.
fn read_exif_block(bytes: &[u8], path: &Path) -> Option<Vec<u8>> {
    let mut reader = BufReader::new(Cursor::new(bytes));
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Some(exif.buf().to_vec()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no EXIF block");
            None
        }
    }
}

fn save_jpeg(image: &RgbImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality as u8)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

fn save_png(image: &RgbImage, path: &Path) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    image::codecs::png::PngEncoder::new(writer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<Photo, BackendError> {
        let bytes = std::fs::read(path)?;
        let image = decode_bytes(&bytes, path)?;
        let photo = Photo::new(image);
        Ok(match read_exif_block(&bytes, path) {
            Some(raw) => photo.with_exif(raw),
            None => photo,
        })
    }

    fn load_logo(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        let bytes = std::fs::read(path)?;
        decode_bytes(&bytes, path)
    }

    fn save(&self, image: &RgbImage, params: &SaveParams) -> Result<(), BackendError> {
        let ext = params
            .output
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "jpg" | "jpeg" => save_jpeg(image, &params.output, params.quality.value()),
            "png" => save_png(image, &params.output),
            other => Err(BackendError::ProcessingFailed(format!(
                "Unsupported output format: {}",
                other
            ))),
        }
    }
}
