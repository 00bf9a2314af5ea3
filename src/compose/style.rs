//! Frame proportions derived from the target size.

use crate::imaging::operations::BLACK;
use image::Rgb;

/// Every spacing and font size a layout uses, as fixed fractions of the
/// width the photo is scaled to.
///
/// Built once per compose call and passed by value; nothing here is shared
/// between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleConstants {
    pub target_size: u32,
    pub border: u32,
    pub border_color: Rgb<u8>,
    pub exterior: u32,
    pub info_area: u32,
    pub font_size: u32,
}

impl StyleConstants {
    /// Disabling the border keeps a hairline (0.01% of the target) rather
    /// than dropping it.
    ///
    /// # Examples
    /// ```
    /// # use filmframe::compose::StyleConstants;
    /// let style = StyleConstants::new(2400, true);
    /// assert_eq!(
    ///     (style.border, style.exterior, style.info_area, style.font_size),
    ///     (24, 72, 288, 57)
    /// );
    /// ```
    pub fn new(target_size: u32, border_enabled: bool) -> Self {
        let t = target_size as f64;
        let border = if border_enabled { 0.01 * t } else { 0.0001 * t };
        let info_area = (0.12 * t) as u32;
        Self {
            target_size,
            border: border as u32,
            border_color: BLACK,
            exterior: (0.03 * t) as u32,
            info_area,
            font_size: (info_area as f64 * 0.2) as u32,
        }
    }

    /// Font size scaled and truncated to whole pixels.
    pub fn font(&self, scale: f64) -> u32 {
        (self.font_size as f64 * scale) as u32
    }

    /// Same as [`font`](Self::font), as the float text renderers take.
    pub fn font_px(&self, scale: f64) -> f32 {
        self.font(scale) as f32
    }
}
