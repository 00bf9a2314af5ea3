//! Layout plans and the painter that turns them into pixels.
//!
//! A layout decides *where* things go; [`paint`] is the only code that
//! touches the canvas. Plans are built fresh for every call from the photo
//! size, the logo sizes and the measured caption widths.

use super::style::StyleConstants;
use crate::imaging::calculations::SwatchFill;
use crate::imaging::operations::{
    WHITE, canvas, expand_border, paste, paste_logo, render_swatch, resize, rotate_quarter,
};
use crate::imaging::text::draw_bold;
use crate::imaging::{PaletteExtractor, TextRenderer};
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};

/// Number of dominant colors in a swatch bar.
pub const SWATCH_COLORS: usize = 4;

pub const TEXT_PRIMARY: Rgb<u8> = Rgb([0, 0, 0]);
pub const TEXT_MUTED: Rgb<u8> = Rgb([80, 80, 80]);
pub const TEXT_FAINT: Rgb<u8> = Rgb([120, 120, 120]);

/// A sized box at a canvas position. Positions may be negative; anything
/// outside the canvas is clipped when painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub size: (u32, u32),
    pub at: (i64, i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoSlot {
    /// Camera-maker logo.
    Primary,
    /// Film-stock logo.
    Film,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    pub slot: LogoSlot,
    pub placement: Placement,
    /// Blend through the logo's alpha channel instead of pasting it opaque.
    pub keep_alpha: bool,
}

/// Which version of the photo the swatch colors are taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwatchSource {
    Original,
    Resized,
    Bordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwatchPlacement {
    pub placement: Placement,
    pub fill: SwatchFill,
    pub source: SwatchSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub at: (i32, i32),
    pub px: f32,
    pub color: Rgb<u8>,
    pub bold: bool,
}

/// Complete geometry of one composed canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub canvas: (u32, u32),
    /// `size` is the resized photo without its border; `at` is where the
    /// bordered photo's top-left corner lands.
    pub photo: Placement,
    pub photo_filter: FilterType,
    pub logos: Vec<LogoPlacement>,
    pub swatch: SwatchPlacement,
    pub text: Vec<TextLine>,
    /// Frame the photo turned a quarter clockwise, then turn the finished
    /// canvas back.
    pub quarter_turn: bool,
}

/// Everything a painter needs besides the plan.
pub struct PaintContext<'a> {
    pub image: &'a RgbImage,
    pub logo: Option<&'a DynamicImage>,
    pub film_logo: Option<&'a DynamicImage>,
    pub style: &'a StyleConstants,
    pub text: &'a dyn TextRenderer,
    pub palette: &'a dyn PaletteExtractor,
}

/// Offset that centers `content` in `container`, flooring like integer
/// division does for negative values.
pub fn centered(container: u32, content: u32) -> i64 {
    (container as i64 - content as i64).div_euclid(2)
}

pub fn paint(plan: &LayoutPlan, ctx: &PaintContext<'_>) -> RgbImage {
    let source = if plan.quarter_turn {
        rotate_quarter(ctx.image, true)
    } else {
        ctx.image.clone()
    };
    let (pw, ph) = plan.photo.size;
    let resized = resize(&source, pw, ph, plan.photo_filter);
    let bordered = expand_border(&resized, ctx.style.border, ctx.style.border_color);

    let mut out = canvas(plan.canvas.0, plan.canvas.1, WHITE);
    paste(&mut out, &bordered, plan.photo.at.0, plan.photo.at.1);

    for logo in &plan.logos {
        let image = match logo.slot {
            LogoSlot::Primary => ctx.logo,
            LogoSlot::Film => ctx.film_logo,
        };
        if let Some(image) = image {
            paste_logo(
                &mut out,
                image,
                logo.placement.size,
                logo.placement.at,
                logo.keep_alpha,
            );
        }
    }

    let swatch = &plan.swatch;
    let colors = ctx.palette.dominant_colors(
        match swatch.source {
            SwatchSource::Original => &source,
            SwatchSource::Resized => &resized,
            SwatchSource::Bordered => &bordered,
        },
        SWATCH_COLORS,
    );
    let (sw, sh) = swatch.placement.size;
    if sw > 0 && sh > 0 && !colors.is_empty() {
        let bar = render_swatch(&colors, sw, sh, swatch.fill);
        paste(&mut out, &bar, swatch.placement.at.0, swatch.placement.at.1);
    }

    for line in plan.text.iter().filter(|l| !l.text.is_empty()) {
        if line.bold {
            draw_bold(ctx.text, &mut out, &line.text, line.at, line.px, line.color);
        } else {
            ctx.text.draw(&mut out, &line.text, line.at, line.px, line.color);
        }
    }

    if plan.quarter_turn {
        rotate_quarter(&out, false)
    } else {
        out
    }
}
