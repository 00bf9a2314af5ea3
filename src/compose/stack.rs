//! `basic2`: everything centered in one column.
//!
//! ```text
//! +------------------+
//! |       LOGO       |
//! |  +------------+  |
//! |  |   PHOTO    |  |
//! |  +------------+  |
//! |     [swatch]     |
//! |   Camera  Lens   |
//! |   supplementary  |
//! +------------------+
//! ```
//!
//! The canvas height is the sum of the element heights and the gaps between
//! them. The logo band is reserved even when no logo is available.

use super::caption::CaptionBlock;
use super::plan::{
    LayoutPlan, LogoPlacement, LogoSlot, Placement, SwatchPlacement, SwatchSource, TEXT_MUTED,
    TEXT_PRIMARY, TextLine, centered,
};
use super::style::StyleConstants;
use crate::imaging::TextRenderer;
use crate::imaging::calculations::{SwatchFill, fit_height, fit_width};
use image::imageops::FilterType;

pub fn plan(
    photo: (u32, u32),
    logo: Option<(u32, u32)>,
    caption: &CaptionBlock,
    style: &StyleConstants,
    text: &dyn TextRenderer,
) -> LayoutPlan {
    let t = style.target_size;
    let b = style.border;
    let ext = style.exterior;
    let (_, new_h) = fit_width(photo, t);
    let bordered = (t + 2 * b, new_h + 2 * b);

    let logo_h = style.info_area as f64 * 0.6;
    let swatch_h = style.font(0.8);
    let text1_h = style.font_size;
    let text2_h = style.font(0.9);
    let suppli_h = if caption.supplementary.is_some() {
        style.font(0.8)
    } else {
        0
    };
    let spacing = ext / 2;
    let max_text_h = text1_h.max(text2_h);

    let total_h = logo_h
        + (spacing * 3) as f64
        + bordered.1 as f64
        + (spacing * 2 + swatch_h + spacing * 2 + max_text_h + spacing * 2 + suppli_h) as f64;
    let width = t + 2 * b + 2 * ext;
    let canvas = (width, (total_h + (2 * ext) as f64) as u32);

    let logos = logo
        .map(|source| {
            let size = fit_height(source, logo_h);
            LogoPlacement {
                slot: LogoSlot::Primary,
                placement: Placement {
                    size,
                    at: (centered(width, size.0), ext as i64),
                },
                keep_alpha: false,
            }
        })
        .into_iter()
        .collect();

    let photo_y = (ext as f64 + logo_h + (spacing * 2) as f64) as i64;
    let swatch_w = style.font(15.0);
    let swatch_y = photo_y + (bordered.1 + spacing * 2) as i64;
    let text_y = (swatch_y + (swatch_h + spacing * 2) as i64) as i32;

    // Both caption parts share one centered row
    let px1 = style.font_px(1.0);
    let px2 = style.font_px(0.9);
    let w1 = text.measure(&caption.primary, px1);
    let w2 = text.measure(&caption.secondary, px2);
    let gap = style.font(0.5);
    let x_start = centered(width, w1 + gap + w2) as i32;

    let mut lines = vec![
        TextLine {
            text: caption.primary.clone(),
            at: (x_start, text_y),
            px: px1,
            color: TEXT_PRIMARY,
            bold: false,
        },
        TextLine {
            text: caption.secondary.clone(),
            at: (x_start + (w1 + gap) as i32, text_y),
            px: px2,
            color: TEXT_PRIMARY,
            bold: false,
        },
    ];
    if let Some(line) = &caption.supplementary {
        let px = style.font_px(0.8);
        lines.push(TextLine {
            text: line.clone(),
            at: (
                centered(width, text.measure(line, px)) as i32,
                text_y + (max_text_h + spacing) as i32,
            ),
            px,
            color: TEXT_MUTED,
            bold: false,
        });
    }

    LayoutPlan {
        canvas,
        photo: Placement {
            size: (t, new_h),
            at: (centered(width, bordered.0), photo_y),
        },
        photo_filter: FilterType::CatmullRom,
        logos,
        swatch: SwatchPlacement {
            placement: Placement {
                size: (swatch_w, swatch_h),
                at: (centered(width, swatch_w), swatch_y),
            },
            fill: SwatchFill::Overlap,
            source: SwatchSource::Resized,
        },
        text: lines,
        quarter_turn: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MonoText;

    #[test]
    fn column_geometry() {
        // t=1000: border 10, exterior 30, info 120, font 24; spacing 15
        let style = StyleConstants::new(1000, true);
        let caption = CaptionBlock::parse("Camera\n\nLens", Some("ISO 400"));
        let plan = plan((2000, 1000), Some((200, 100)), &caption, &style, &MonoText::default());

        let bordered_h = 500 + 20;
        // 72 + 45 + 520 + 30 + 19 + 30 + 24 + 30 + 19 = 789, plus 60
        assert_eq!(plan.canvas, (1080, 849));
        assert_eq!(plan.photo.at, (30, 30 + 72 + 30));

        let logo = plan.logos[0].placement;
        assert_eq!(logo.size, (144, 72));
        assert_eq!(logo.at, ((1080 - 144) / 2, 30));

        let swatch_y = 132 + bordered_h as i64 + 30;
        assert_eq!(plan.swatch.placement.at, ((1080 - 360) / 2, swatch_y));

        // "Camera" at 24px = 72, "Lens" at 21px = 42, gap 12
        let text_y = (swatch_y + 19 + 30) as i32;
        let x_start = (1080 - (72 + 12 + 42)) / 2;
        assert_eq!(plan.text[0].at, (x_start, text_y));
        assert_eq!(plan.text[1].at, (x_start + 84, text_y));
        // "ISO 400" at 19px = 66
        assert_eq!(plan.text[2].at, ((1080 - 66) / 2, text_y + 24 + 15));
    }

    #[test]
    fn logo_band_is_reserved_without_a_logo() {
        let style = StyleConstants::new(1000, true);
        let caption = CaptionBlock::parse("Camera\n\nLens", None);
        let with = plan((2000, 1000), Some((200, 100)), &caption, &style, &MonoText::default());
        let without = plan((2000, 1000), None, &caption, &style, &MonoText::default());
        assert_eq!(with.canvas, without.canvas);
        assert_eq!(with.photo, without.photo);
        assert!(without.logos.is_empty());
    }
}
