//! `basic1`: the photo on top, an info strip below it.
//!
//! ```text
//! +--------------------------------+
//! |  +--------------------------+  |
//! |  |          PHOTO           |  |
//! |  +--------------------------+  |
//! |  Camera                 LOGO   |
//! |  Lens                          |
//! |  [swatch]                      |
//! |  Focal / aperture / ISO        |
//! +--------------------------------+
//! ```
//!
//! Portrait photos are framed sideways and the canvas turned back, so the
//! strip ends up along the long edge.

use super::caption::CaptionBlock;
use super::plan::{
    LayoutPlan, LogoPlacement, LogoSlot, Placement, SwatchPlacement, SwatchSource, TEXT_MUTED,
    TEXT_PRIMARY, TextLine,
};
use super::style::StyleConstants;
use crate::imaging::calculations::{SwatchFill, fit_height, fit_width, needs_quarter_turn};
use image::imageops::FilterType;

pub fn plan(
    photo: (u32, u32),
    logo: Option<(u32, u32)>,
    caption: &CaptionBlock,
    style: &StyleConstants,
) -> LayoutPlan {
    let quarter_turn = needs_quarter_turn(photo.0, photo.1);
    let upright = if quarter_turn { (photo.1, photo.0) } else { photo };

    let t = style.target_size;
    let b = style.border;
    let ext = style.exterior;
    let font = style.font_size as f64;
    let (_, new_h) = fit_width(upright, t);

    let canvas = (
        t + 2 * b + 2 * ext,
        new_h + 2 * b + 3 * ext + style.info_area,
    );

    // Everything in the strip hangs off the line just below the photo
    let strip_top = (2 * ext + new_h + 2 * b) as f64;
    let left = (ext as f64 * 1.01) as i64;

    let logos = logo
        .map(|source| {
            let band = style.info_area as f64 * 0.8;
            let size = fit_height(source, band);
            let exact_w = source.0 as f64 * band / source.1.max(1) as f64;
            LogoPlacement {
                slot: LogoSlot::Primary,
                placement: Placement {
                    size,
                    at: (
                        ((t + 2 * b + ext) as f64 - exact_w) as i64,
                        (new_h + 2 * b + 2 * ext) as i64,
                    ),
                },
                keep_alpha: false,
            }
        })
        .into_iter()
        .collect();

    let mut text = vec![
        TextLine {
            text: caption.primary.clone(),
            at: (left as i32, strip_top as i32),
            px: style.font_px(1.0),
            color: TEXT_PRIMARY,
            bold: true,
        },
        TextLine {
            text: caption.secondary.clone(),
            at: (left as i32, (strip_top + 1.6 * font) as i32),
            px: style.font_px(0.9),
            color: TEXT_PRIMARY,
            bold: false,
        },
    ];
    if let Some(line) = &caption.supplementary {
        text.push(TextLine {
            text: line.clone(),
            at: (left as i32, (strip_top + 4.2 * font) as i32),
            px: style.font_px(0.8),
            color: TEXT_MUTED,
            bold: false,
        });
    }

    LayoutPlan {
        canvas,
        photo: Placement {
            size: (t, new_h),
            at: (ext as i64, ext as i64),
        },
        photo_filter: FilterType::CatmullRom,
        logos,
        swatch: SwatchPlacement {
            placement: Placement {
                size: (style.font(15.0), style.font(0.8)),
                at: (left, (strip_top + 3.0 * font) as i64),
            },
            fill: SwatchFill::Overlap,
            source: SwatchSource::Bordered,
        },
        text,
        quarter_turn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caption() -> CaptionBlock {
        CaptionBlock::parse("Leica M6\n\nSummicron 35", Some("Portra 400"))
    }

    #[test]
    fn landscape_geometry() {
        // t=1000: border 10, exterior 30, info 120, font 24
        let style = StyleConstants::new(1000, true);
        let plan = plan((3000, 2000), Some((400, 100)), &caption(), &style);

        assert!(!plan.quarter_turn);
        assert_eq!(plan.photo.size, (1000, 666));
        assert_eq!(plan.photo.at, (30, 30));
        assert_eq!(plan.canvas, (1000 + 20 + 60, 666 + 20 + 90 + 120));

        // Logo: 96px tall, right-aligned to the photo's outer edge
        let logo = plan.logos[0].placement;
        assert_eq!(logo.size, (384, 96));
        assert_eq!(logo.at, (1050 - 384, 666 + 20 + 60));

        let strip_top = 60 + 666 + 20;
        assert_eq!(plan.text[0].at, (30, strip_top));
        assert!(plan.text[0].bold);
        assert_eq!(plan.text[1].at, (30, strip_top + 38));
        assert_eq!(plan.text[1].px, 21.0);
        assert_eq!(plan.text[2].at, (30, strip_top + 100));
        assert_eq!(plan.text[2].color, TEXT_MUTED);

        assert_eq!(plan.swatch.placement.size, (360, 19));
        assert_eq!(plan.swatch.placement.at, (30, strip_top as i64 + 72));
        assert_eq!(plan.swatch.fill, SwatchFill::Overlap);
    }

    #[test]
    fn portrait_is_framed_sideways() {
        let style = StyleConstants::new(1000, true);
        let plan = plan((2000, 3000), None, &caption(), &style);
        assert!(plan.quarter_turn);
        assert_eq!(plan.photo.size, (1000, 666));
        assert!(plan.logos.is_empty());
    }

    #[test]
    fn no_supplementary_line_without_text() {
        let style = StyleConstants::new(1000, true);
        let caption = CaptionBlock::parse("A\n\nB", None);
        assert_eq!(plan((300, 200), None, &caption, &style).text.len(), 2);
    }
}
