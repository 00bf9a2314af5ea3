//! Per-pixel tone math shared by the filters.
//!
//! Pixels are `[f32; 3]` in `[0, 1]`. Masks are scalar weights in `[0, 1]`
//! derived from luminance or channel balance and are recomputed on every
//! call, never stored.

use image::{Rgb, Rgb32FImage, RgbImage};

pub type Px = [f32; 3];

#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

#[inline]
pub fn clamp_px(p: Px) -> Px {
    [clamp01(p[0]), clamp01(p[1]), clamp01(p[2])]
}

/// Multiplicative factor for a look whose calibrated value at strength 0.5
/// is `baseline`: neutral at 0, `baseline` at 0.5, twice the deviation at 1.
///
/// # Examples
/// ```
/// # use filmframe::filters::tone::scale_factor;
/// assert_eq!(scale_factor(1.5, 0.0), 1.0);
/// assert_eq!(scale_factor(1.5, 0.5), 1.5);
/// assert_eq!(scale_factor(1.5, 1.0), 2.0);
/// ```
pub fn scale_factor(baseline: f32, strength: f32) -> f32 {
    let k = clamp01(strength) / 0.5;
    1.0 + (baseline - 1.0) * k
}

/// BT.709 luminance, used by the film-stock masks.
#[inline]
pub fn luminance(p: Px) -> f32 {
    0.2126 * p[0] + 0.7152 * p[1] + 0.0722 * p[2]
}

/// Rec.601 luma, the grayscale used by the classic enhance operations.
#[inline]
pub fn luma601(p: Px) -> f32 {
    0.299 * p[0] + 0.587 * p[1] + 0.114 * p[2]
}

/// Ramp from 0 at `start` to 1 at `start + width`.
#[inline]
pub fn mask_above(l: f32, start: f32, width: f32) -> f32 {
    clamp01((l - start) / width)
}

/// Ramp from 0 at `cutoff` down to 1 at `cutoff - width`.
#[inline]
pub fn mask_below(l: f32, cutoff: f32, width: f32) -> f32 {
    clamp01((cutoff - l) / width)
}

/// How much `primary` exceeds the mean of the other two channels.
#[inline]
pub fn dominance(primary: f32, other1: f32, other2: f32, scale: f32) -> f32 {
    clamp01((primary - 0.5 * (other1 + other2)) * scale)
}

#[inline]
pub fn yellow_mask(p: Px) -> f32 {
    clamp01(p[0].min(p[1]) - p[2])
}

/// `mid + (x - mid) * factor` on every channel, unclamped.
#[inline]
pub fn contrast_about(p: Px, factor: f32, mid: f32) -> Px {
    p.map(|x| mid + (x - mid) * factor)
}

#[inline]
pub fn mix(a: Px, b: Px, t: f32) -> Px {
    [
        a[0] * (1.0 - t) + b[0] * t,
        a[1] * (1.0 - t) + b[1] * t,
        a[2] * (1.0 - t) + b[2] * t,
    ]
}

/// Pull a pixel toward a flat gray level by `amount`.
#[inline]
pub fn toward_gray(p: Px, gray: f32, amount: f32) -> Px {
    mix(p, [gray; 3], amount)
}

#[inline]
pub fn multiply(p: Px, gains: Px) -> Px {
    [p[0] * gains[0], p[1] * gains[1], p[2] * gains[2]]
}

/// Row-major 3×3 matrix times column pixel.
#[inline]
pub fn matrix(p: Px, m: &[[f32; 3]; 3]) -> Px {
    [
        m[0][0] * p[0] + m[0][1] * p[1] + m[0][2] * p[2],
        m[1][0] * p[0] + m[1][1] * p[1] + m[1][2] * p[2],
        m[2][0] * p[0] + m[2][1] * p[1] + m[2][2] * p[2],
    ]
}

pub fn rgb8(r: u8, g: u8, b: u8) -> Px {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

/// Apply `f` to every pixel, producing a new image.
pub fn map_pixels(image: &Rgb32FImage, f: impl Fn(Px) -> Px) -> Rgb32FImage {
    let mut out = image.clone();
    for px in out.pixels_mut() {
        px.0 = f(px.0);
    }
    out
}

pub fn to_float(image: &RgbImage) -> Rgb32FImage {
    Rgb32FImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        Rgb(rgb8(p[0], p[1], p[2]))
    })
}

/// Quantize back to 8 bits, rounding half up.
pub fn to_u8(image: &Rgb32FImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y).0;
        Rgb(p.map(|c| (clamp01(c) * 255.0 + 0.5) as u8))
    })
}

/// Radial darkening toward the corners.
///
/// Distance is measured from the pixel-grid center in units of half the
/// width and half the height, so the edge midpoints sit at 1.0.
pub fn vignette(image: &Rgb32FImage, strength: f32, inner: f32, outer: f32, amount: f32) -> Rgb32FImage {
    if strength <= 0.0 {
        return image.clone();
    }
    let (w, h) = image.dimensions();
    let cx = (w as f32 - 1.0) * 0.5;
    let cy = (h as f32 - 1.0) * 0.5;
    let hw = 0.5 * w as f32 + 1e-6;
    let hh = 0.5 * h as f32 + 1e-6;
    let v = amount * strength;

    let mut out = image.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = (x as f32 - cx) / hw;
        let dy = (y as f32 - cy) / hh;
        let mask = clamp01(((dx * dx + dy * dy).sqrt() - inner) / outer);
        let mult = 1.0 - v * mask * mask;
        px.0 = clamp_px(px.0.map(|c| c * mult));
    }
    out
}
