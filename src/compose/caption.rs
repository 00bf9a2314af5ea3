//! Caption text for the info area.
//!
//! Callers pass a single string: the primary line, a blank line, then the
//! secondary line (`"FUJIFILM X-T4\n\nXF23mmF2 R WR"`). When the string is
//! empty the caption comes from the photo's EXIF block instead; see
//! [`crate::metadata`].

use crate::metadata::CameraMetadata;

/// Separator between the primary and secondary lines.
pub const LINE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionBlock {
    pub primary: String,
    pub secondary: String,
    pub supplementary: Option<String>,
}

fn clean(part: &str) -> String {
    part.trim_matches('\0').to_string()
}

impl CaptionBlock {
    /// Split caller text on the first blank line. Missing parts are empty;
    /// padding NULs (common in strings lifted from EXIF) are stripped.
    pub fn parse(text: &str, supplementary: Option<&str>) -> Self {
        let (primary, secondary) = text.split_once(LINE_SEPARATOR).unwrap_or((text, ""));
        // Anything after a second separator is not part of the caption
        let secondary = secondary.split(LINE_SEPARATOR).next().unwrap_or("");
        Self {
            primary: clean(primary),
            secondary: clean(secondary),
            supplementary: supplementary
                .map(clean)
                .filter(|s| !s.is_empty()),
        }
    }

    /// Caption written by the camera. The exposure summary replaces any
    /// caller-supplied supplementary line; without usable exposure fields the
    /// caller's line is kept.
    pub fn from_metadata(meta: &CameraMetadata, supplementary: Option<&str>) -> Self {
        let fallback = supplementary.map(clean).filter(|s| !s.is_empty());
        Self {
            primary: meta.camera_line(),
            secondary: meta.lens.clone().unwrap_or_default(),
            supplementary: meta
                .exposure
                .as_ref()
                .map(|e| e.summary())
                .or(fallback),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty() && self.supplementary.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Exposure;

    #[test]
    fn parse_two_lines() {
        let caption = CaptionBlock::parse("Leica M6\n\nSummicron 35mm", None);
        assert_eq!(caption.primary, "Leica M6");
        assert_eq!(caption.secondary, "Summicron 35mm");
        assert_eq!(caption.supplementary, None);
    }

    #[test]
    fn parse_single_line_and_empty() {
        assert_eq!(CaptionBlock::parse("Only one", None).secondary, "");
        assert!(CaptionBlock::parse("", None).is_empty());
        assert!(CaptionBlock::parse("", Some("")).is_empty());
    }

    #[test]
    fn parse_strips_nul_padding_and_ignores_extra_parts() {
        let caption = CaptionBlock::parse("Canon\0\0\n\nRF 50mm\0\n\nleftover", Some("note\0"));
        assert_eq!(caption.primary, "Canon");
        assert_eq!(caption.secondary, "RF 50mm");
        assert_eq!(caption.supplementary.as_deref(), Some("note"));
    }

    #[test]
    fn single_newlines_stay_in_primary() {
        let caption = CaptionBlock::parse("a\nb", None);
        assert_eq!(caption.primary, "a\nb");
    }

    fn meta(exposure: Option<Exposure>) -> CameraMetadata {
        CameraMetadata {
            make: "FUJIFILM".into(),
            model: "X-T4".into(),
            lens: Some("XF23mmF2 R WR".into()),
            exposure,
        }
    }

    #[test]
    fn metadata_caption_uses_exposure_summary() {
        let exposure = Exposure {
            focal_mm: 23.0,
            f_number: 2.0,
            iso: 400,
            exposure_time: (1, 250),
        };
        let caption = CaptionBlock::from_metadata(&meta(Some(exposure)), Some("ignored"));
        assert_eq!(caption.primary, "FUJIFILM X-T4");
        assert_eq!(caption.secondary, "XF23mmF2 R WR");
        assert_eq!(
            caption.supplementary.as_deref(),
            Some("Focal: 23mm    A: F2.0    ISO: 400    S: 1/250s")
        );
    }

    #[test]
    fn metadata_caption_without_exposure_keeps_caller_line() {
        let caption = CaptionBlock::from_metadata(&meta(None), Some("Kodak Gold 200"));
        assert_eq!(caption.supplementary.as_deref(), Some("Kodak Gold 200"));
        assert_eq!(CaptionBlock::from_metadata(&meta(None), None).supplementary, None);
    }
}
