//! Camera metadata for automatic captions.
//!
//! When a render request carries no caption text, layouts fall back to what
//! the camera wrote into the photo:
//!
//! - **Primary line**: `Make Model` (e.g. "FUJIFILM X-T4")
//! - **Secondary line**: the lens model, when recorded
//! - **Supplementary line**: focal length, aperture, ISO and shutter speed,
//!   formatted as `Focal: 23mm    A: F2.0    ISO: 400    S: 1/250s`
//!
//! The camera make also selects the logo from the `[logos]` table.
//!
//! Parsing works on the raw EXIF block captured at decode time (see
//! [`Photo::exif`](crate::imaging::Photo::exif)). A photo without Make and
//! Model has no usable caption and yields an error; broken exposure fields
//! only drop the supplementary line.

use exif::{Exif, Field, In, Tag, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("no EXIF block")]
    Absent,
    #[error("malformed EXIF: {0}")]
    Parse(#[from] exif::Error),
    #[error("EXIF field {0} is missing")]
    Missing(&'static str),
    #[error("EXIF field {field} is unusable: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Exposure settings from the Exif IFD.
#[derive(Debug, Clone, PartialEq)]
pub struct Exposure {
    pub focal_mm: f64,
    pub f_number: f64,
    pub iso: u32,
    /// Exposure time as a (numerator, denominator) fraction of a second.
    pub exposure_time: (u32, u32),
}

impl Exposure {
    /// Shutter speed the way photographers write it: `1/250s` below a
    /// second, whole seconds otherwise.
    pub fn shutter_text(&self) -> String {
        let (num, denom) = self.exposure_time;
        let per_second = denom as f64 / num as f64;
        if per_second > 1.0 {
            format!("1/{}s", per_second as u64)
        } else {
            format!("{}s", (1.0 / per_second) as u64)
        }
    }

    pub fn summary(&self) -> String {
        // Shortest round-trip form: F2.0, F1.4, F1.85
        format!(
            "Focal: {}mm    A: F{:?}    ISO: {}    S: {}",
            self.focal_mm as u64,
            self.f_number,
            self.iso,
            self.shutter_text()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraMetadata {
    pub make: String,
    pub model: String,
    pub lens: Option<String>,
    pub exposure: Option<Exposure>,
}

impl CameraMetadata {
    pub fn camera_line(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

/// Parse camera metadata from a raw EXIF block.
pub fn read_camera_metadata(raw: Option<&[u8]>) -> Result<CameraMetadata, MetadataError> {
    let raw = raw.ok_or(MetadataError::Absent)?;
    let exif = exif::Reader::new().read_raw(raw.to_vec())?;

    let make = ascii_field(&exif, Tag::Make).ok_or(MetadataError::Missing("Make"))?;
    let model = ascii_field(&exif, Tag::Model).ok_or(MetadataError::Missing("Model"))?;
    let lens = ascii_field(&exif, Tag::LensModel);

    let exposure = match read_exposure(&exif) {
        Ok(exposure) => Some(exposure),
        Err(e) => {
            debug!(error = %e, "exposure fields unusable, dropping supplementary line");
            None
        }
    };

    Ok(CameraMetadata {
        make,
        model,
        lens,
        exposure,
    })
}

fn field<'a>(exif: &'a Exif, tag: Tag, name: &'static str) -> Result<&'a Field, MetadataError> {
    exif.get_field(tag, In::PRIMARY)
        .ok_or(MetadataError::Missing(name))
}

/// First ASCII component, trimmed of padding NULs and whitespace.
fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(parts) => parts
            .first()
            .map(|bytes| {
                String::from_utf8_lossy(bytes)
                    .trim_matches(|c: char| c == '\0' || c.is_whitespace())
                    .to_string()
            })
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn rational(exif: &Exif, tag: Tag, name: &'static str) -> Result<(u32, u32), MetadataError> {
    match &field(exif, tag, name)?.value {
        Value::Rational(values) => match values.first() {
            Some(r) if r.denom != 0 => Ok((r.num, r.denom)),
            Some(_) => Err(MetadataError::Invalid {
                field: name,
                reason: "zero denominator".to_string(),
            }),
            None => Err(MetadataError::Missing(name)),
        },
        other => Err(MetadataError::Invalid {
            field: name,
            reason: format!("expected rational, found {other:?}"),
        }),
    }
}

fn read_exposure(exif: &Exif) -> Result<Exposure, MetadataError> {
    let (focal_num, focal_den) = rational(exif, Tag::FocalLength, "FocalLength")?;
    let (f_num, f_den) = rational(exif, Tag::FNumber, "FNumber")?;
    let exposure_time = rational(exif, Tag::ExposureTime, "ExposureTime")?;
    if exposure_time.0 == 0 {
        return Err(MetadataError::Invalid {
            field: "ExposureTime",
            reason: "zero exposure".to_string(),
        });
    }
    let iso = field(exif, Tag::PhotographicSensitivity, "PhotographicSensitivity")?
        .value
        .get_uint(0)
        .ok_or(MetadataError::Invalid {
            field: "PhotographicSensitivity",
            reason: "not an integer".to_string(),
        })?;

    Ok(Exposure {
        focal_mm: focal_num as f64 / focal_den as f64,
        f_number: f_num as f64 / f_den as f64,
        iso,
        exposure_time,
    })
}
