//! `basic3`: an info panel beside the photo.
//!
//! ```text
//! +---------------+ +-------------+
//! |     LOGO      | |             |
//! |  (FILM LOGO)  | |             |
//! |   [swatch]    | |    PHOTO    |
//! |    Camera     | |             |
//! |     Lens      | |             |
//! | supplementary | |             |
//! +---------------+ +-------------+
//! ```
//!
//! The panel is as wide as its widest caption line (supplementary text is
//! word-wrapped first) but never narrower than twelve font sizes, so the
//! swatch keeps a usable width. Whichever column is shorter is centered
//! vertically against the other.

use super::caption::CaptionBlock;
use super::plan::{
    LayoutPlan, LogoPlacement, LogoSlot, Placement, SwatchPlacement, SwatchSource, TEXT_FAINT,
    TEXT_MUTED, TEXT_PRIMARY, TextLine, centered,
};
use super::style::StyleConstants;
use crate::imaging::TextRenderer;
use crate::imaging::calculations::{SwatchFill, fit_width, wrap_words};
use image::imageops::FilterType;

/// Share of the panel's content width taken by a lone logo.
const SINGLE_LOGO_RATIO: f64 = 0.66;
/// Camera and film logos stacked: the camera logo is the larger of the two.
const PRIMARY_LOGO_RATIO: f64 = 0.56;
const FILM_LOGO_RATIO: f64 = 0.42;

/// Minimum content width, in font sizes.
const MIN_CONTENT_FONTS: f64 = 12.0;

/// Logo sizes known before layout, as (width, height) of the source files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelLogos {
    pub primary: Option<(u32, u32)>,
    pub film: Option<(u32, u32)>,
}

fn logo_size(source: (u32, u32), width: u32) -> (u32, u32) {
    let ratio = source.1 as f64 / source.0.max(1) as f64;
    (width, (width as f64 * ratio) as u32)
}

pub fn plan(
    photo: (u32, u32),
    logos: PanelLogos,
    caption: &CaptionBlock,
    style: &StyleConstants,
    text: &dyn TextRenderer,
) -> LayoutPlan {
    let t = style.target_size;
    let b = style.border;
    let ext = style.exterior;
    let pad = ext;

    let px1 = style.font_px(1.0);
    let px2 = style.font_px(0.9);
    let px_suppli = style.font_px(0.8);

    let mut desired = text
        .measure(&caption.primary, px1)
        .max(text.measure(&caption.secondary, px2));
    let suppli_lines = caption
        .supplementary
        .as_deref()
        .map(|line| wrap_words(line, desired, |s| text.measure(s, px_suppli)))
        .unwrap_or_default();
    for line in &suppli_lines {
        desired = desired.max(text.measure(line, px_suppli));
    }
    desired = desired.max(style.font(MIN_CONTENT_FONTS));

    let left_w = desired + 2 * pad;
    let content_w = (left_w - 2 * pad).max(1);

    // Logos: one wide logo, or camera over film when both resolve
    let sized: Vec<(LogoSlot, (u32, u32))> = match (logos.primary, logos.film) {
        (Some(primary), Some(film)) => vec![
            (
                LogoSlot::Primary,
                logo_size(primary, ((content_w as f64 * PRIMARY_LOGO_RATIO) as u32).max(1)),
            ),
            (
                LogoSlot::Film,
                logo_size(film, ((content_w as f64 * FILM_LOGO_RATIO) as u32).max(1)),
            ),
        ],
        (Some(only), None) => vec![(
            LogoSlot::Primary,
            logo_size(only, ((content_w as f64 * SINGLE_LOGO_RATIO) as u32).max(1)),
        )],
        (None, Some(only)) => vec![(
            LogoSlot::Film,
            logo_size(only, ((content_w as f64 * SINGLE_LOGO_RATIO) as u32).max(1)),
        )],
        (None, None) => Vec::new(),
    };
    let sized: Vec<_> = sized.into_iter().filter(|(_, s)| s.1 > 0).collect();

    let spacing = ext;
    let logo_block_h = match sized.as_slice() {
        [] => 0,
        [(_, only)] => only.1,
        [(_, first), (_, second)] => first.1 + spacing + second.1,
        _ => sized.iter().map(|(_, s)| s.1 + spacing).sum::<u32>() - spacing,
    };

    let swatch_h = style.font(0.8);
    let text1_h = style.font_size * 2;
    let text2_h = style.font(0.9) * 2;
    let suppli_h = if caption.supplementary.is_some() {
        style.font(0.8) * 2
    } else {
        0
    };
    let left_panel_h = logo_block_h
        + spacing * 2
        + swatch_h
        + spacing * 2
        + text1_h
        + spacing
        + text2_h
        + spacing
        + suppli_h;

    let (_, img_h) = fit_width(photo, t);
    let img_total_h = img_h + 2 * b;
    let (img_y_offset, total_h) = if img_total_h < left_panel_h {
        ((left_panel_h - img_total_h) / 2, left_panel_h)
    } else {
        (0, img_total_h)
    };

    let canvas = (left_w + t + 2 * b + 2 * ext, total_h + 2 * ext);

    // Center the drawn panel content, which differs from the reserved height
    let suppli_line_h = style.font(1.2);
    let mut text_block_h = text1_h + spacing + text2_h;
    if caption.supplementary.is_some() {
        text_block_h += spacing + suppli_lines.len() as u32 * suppli_line_h;
    }
    let left_block_h = logo_block_h + spacing * 2 + swatch_h + spacing * 2 + text_block_h;
    let mut y = ext as i64 + (total_h as i64 - left_block_h as i64).div_euclid(2).max(0);

    let mut logo_y = y;
    let logos = sized
        .iter()
        .map(|&(slot, size)| {
            let placement = Placement {
                size,
                at: (centered(left_w, size.0), logo_y),
            };
            logo_y += (size.1 + spacing) as i64;
            LogoPlacement {
                slot,
                placement,
                keep_alpha: true,
            }
        })
        .collect();
    y += (logo_block_h + spacing * 2) as i64;

    let swatch = SwatchPlacement {
        placement: Placement {
            size: (content_w, swatch_h),
            at: (pad as i64, y),
        },
        fill: SwatchFill::Even,
        source: SwatchSource::Original,
    };
    y += (swatch_h + spacing * 2) as i64;

    let x_in_content = |w: u32| (pad as i64 + centered(content_w, w)) as i32;
    let mut lines = vec![TextLine {
        text: caption.primary.clone(),
        at: (x_in_content(text.measure(&caption.primary, px1)), y as i32),
        px: px1,
        color: TEXT_PRIMARY,
        bold: false,
    }];
    y += (text1_h + spacing) as i64;
    lines.push(TextLine {
        text: caption.secondary.clone(),
        at: (x_in_content(text.measure(&caption.secondary, px2)), y as i32),
        px: px2,
        color: TEXT_MUTED,
        bold: false,
    });
    y += text2_h as i64;

    if caption.supplementary.is_some() {
        y += spacing as i64;
        for line in suppli_lines {
            let at = (x_in_content(text.measure(&line, px_suppli)), y as i32);
            lines.push(TextLine {
                text: line,
                at,
                px: px_suppli,
                color: TEXT_FAINT,
                bold: false,
            });
            y += suppli_line_h as i64;
        }
    }

    LayoutPlan {
        canvas,
        photo: Placement {
            size: (t, img_h),
            at: ((left_w + ext) as i64, (ext + img_y_offset) as i64),
        },
        photo_filter: FilterType::Lanczos3,
        logos,
        swatch,
        text: lines,
        quarter_turn: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MonoText;

    // t=1000: border 10, exterior 30, info 120, font 24
    fn style() -> StyleConstants {
        StyleConstants::new(1000, true)
    }

    #[test]
    fn panel_fits_the_widest_caption_line() {
        let text = MonoText::default();
        let primary = "Hasselblad X2D 100C with a long name";
        let caption = CaptionBlock::parse(&format!("{primary}\n\nXCD 55V"), None);
        let plan = plan((3000, 2000), PanelLogos::default(), &caption, &style(), &text);

        let w1 = text.measure(primary, 24.0);
        let w2 = text.measure("XCD 55V", 21.0);
        let left_w = plan.photo.at.0 as u32 - 30;
        assert!(left_w >= w1.max(w2) + 2 * 30);
        assert!(left_w >= 12 * 24 + 2 * 30);
        assert_eq!(left_w, w1 + 60);
    }

    #[test]
    fn panel_never_narrower_than_the_floor() {
        let caption = CaptionBlock::parse("A\n\nB", None);
        let plan = plan((3000, 2000), PanelLogos::default(), &caption, &style(), &MonoText::default());
        let left_w = plan.photo.at.0 as u32 - 30;
        assert_eq!(left_w, 288 + 60);
        assert_eq!(plan.swatch.placement.size.0, 288);
        assert_eq!(plan.canvas.0, left_w + 1000 + 20 + 60);
    }

    #[test]
    fn supplementary_text_wraps_to_the_panel() {
        let text = MonoText::default();
        // Wrapped against the caption width (42px) before the floor applies
        let long = "Focal: 23mm    A: F2.0    ISO: 400    S: 1/250s";
        let caption = CaptionBlock::parse("Cam\n\nLens", Some(long));
        let plan = plan((3000, 2000), PanelLogos::default(), &caption, &style(), &text);
        let suppli: Vec<_> = plan.text.iter().skip(2).collect();
        assert!(suppli.len() > 1);
        assert!(suppli.iter().all(|l| text.measure(&l.text, 19.0) <= 288));
        assert!(suppli.iter().all(|l| l.color == TEXT_FAINT));
        // Lines step by 1.2 font sizes
        assert_eq!(suppli[1].at.1 - suppli[0].at.1, 28);
    }

    #[test]
    fn tall_panel_centers_the_photo() {
        // A very wide photo is shorter than the panel content
        let plan = plan(
            (4000, 400),
            PanelLogos {
                primary: Some((100, 100)),
                film: None,
            },
            &CaptionBlock::parse("Cam\n\nLens", Some("note")),
            &style(),
            &MonoText::default(),
        );
        // logo 190x190; 190 + 60 + 19 + 60 + 48 + 30 + 42 + 30 + 38 = 517
        let img_total = 100 + 20;
        assert_eq!(plan.canvas.1, 517 + 60);
        assert_eq!(plan.photo.at.1, 30 + (517 - img_total) / 2);
        assert_eq!(plan.logos[0].placement.size, (190, 190));
    }

    #[test]
    fn tall_photo_centers_the_panel() {
        let caption = CaptionBlock::parse("Cam\n\nLens", None);
        let plan = plan((1000, 2000), PanelLogos::default(), &caption, &style(), &MonoText::default());
        assert_eq!(plan.photo.at.1, 30);
        assert_eq!(plan.canvas.1, 2000 + 20 + 60);
        // Drawn block: 0 + 60 + 19 + 60 + (48 + 30 + 42) = 259
        assert_eq!(plan.swatch.placement.at.1, 30 + (2020 - 259) / 2 + 60);
    }

    #[test]
    fn two_logos_stack_with_their_own_ratios() {
        let plan = plan(
            (3000, 2000),
            PanelLogos {
                primary: Some((200, 100)),
                film: Some((100, 100)),
            },
            &CaptionBlock::parse("A\n\nB", None),
            &style(),
            &MonoText::default(),
        );
        let [camera, film] = plan.logos.as_slice() else {
            panic!("expected two logos");
        };
        // content width 288
        assert_eq!(camera.slot, LogoSlot::Primary);
        assert_eq!(camera.placement.size, (161, 80));
        assert_eq!(film.slot, LogoSlot::Film);
        assert_eq!(film.placement.size, (120, 120));
        assert_eq!(film.placement.at.1, camera.placement.at.1 + 80 + 30);
        assert!(camera.keep_alpha && film.keep_alpha);
    }

    #[test]
    fn film_logo_alone_uses_the_single_ratio() {
        let plan = plan(
            (3000, 2000),
            PanelLogos {
                primary: None,
                film: Some((100, 50)),
            },
            &CaptionBlock::parse("A\n\nB", None),
            &style(),
            &MonoText::default(),
        );
        assert_eq!(plan.logos.len(), 1);
        assert_eq!(plan.logos[0].slot, LogoSlot::Film);
        assert_eq!(plan.logos[0].placement.size, (190, 95));
    }
}
