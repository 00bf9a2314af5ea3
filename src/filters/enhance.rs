//! The classic enhancement trio.
//!
//! Each one blends the image with a "degenerate" version of itself: a
//! factor of 1 is identity, below 1 moves toward the degenerate image and
//! above 1 extrapolates away from it.
//!
//! | Operation | Degenerate image |
//! |---|---|
//! | [`color`] | Rec.601 grayscale of the image |
//! | [`contrast`] | flat gray at the image's mean luma |
//! | [`brightness`] | black |
//!
//! Results are clamped to `[0, 1]`.

use super::tone::{Px, clamp_px, luma601, map_pixels};
use image::Rgb32FImage;

#[inline]
fn extrapolate(degenerate: Px, p: Px, factor: f32) -> Px {
    clamp_px([
        degenerate[0] + (p[0] - degenerate[0]) * factor,
        degenerate[1] + (p[1] - degenerate[1]) * factor,
        degenerate[2] + (p[2] - degenerate[2]) * factor,
    ])
}

pub fn grayscale(image: &Rgb32FImage) -> Rgb32FImage {
    map_pixels(image, |p| [luma601(p); 3])
}

pub fn color(image: &Rgb32FImage, factor: f32) -> Rgb32FImage {
    if factor == 1.0 {
        return image.clone();
    }
    map_pixels(image, |p| extrapolate([luma601(p); 3], p, factor))
}

pub fn mean_luma(image: &Rgb32FImage) -> f32 {
    let n = (image.width() as u64 * image.height() as u64).max(1);
    let sum: f64 = image.pixels().map(|p| luma601(p.0) as f64).sum();
    (sum / n as f64) as f32
}

pub fn contrast(image: &Rgb32FImage, factor: f32) -> Rgb32FImage {
    if factor == 1.0 {
        return image.clone();
    }
    let mean = mean_luma(image);
    map_pixels(image, |p| extrapolate([mean; 3], p, factor))
}

pub fn brightness(image: &Rgb32FImage, factor: f32) -> Rgb32FImage {
    if factor == 1.0 {
        return image.clone();
    }
    map_pixels(image, |p| extrapolate([0.0; 3], p, factor))
}

/// Linear blend `a·(1−t) + b·t` of two same-sized images.
pub fn blend(a: &Rgb32FImage, b: &Rgb32FImage, t: f32) -> Rgb32FImage {
    let mut out = a.clone();
    for (dst, src) in out.pixels_mut().zip(b.pixels()) {
        for c in 0..3 {
            dst.0[c] = dst.0[c] * (1.0 - t) + src.0[c] * t;
        }
    }
    out
}

/// Blend toward a flat color.
pub fn blend_flat(image: &Rgb32FImage, color: Px, t: f32) -> Rgb32FImage {
    map_pixels(image, |p| super::tone::mix(p, color, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn px(img: &Rgb32FImage, x: u32, y: u32) -> Px {
        img.get_pixel(x, y).0
    }

    fn two_tone() -> Rgb32FImage {
        Rgb32FImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([0.2, 0.2, 0.2])
            } else {
                Rgb([0.6, 0.6, 0.6])
            }
        })
    }

    #[test]
    fn contrast_pivots_on_mean() {
        let out = contrast(&two_tone(), 1.5);
        // mean 0.4: 0.2 → 0.1, 0.6 → 0.7
        assert!((px(&out, 0, 0)[0] - 0.1).abs() < 1e-6);
        assert!((px(&out, 1, 0)[0] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn color_zero_is_grayscale() {
        let img = Rgb32FImage::from_pixel(1, 1, Rgb([1.0, 0.0, 0.0]));
        let out = color(&img, 0.0);
        assert!((px(&out, 0, 0)[1] - 0.299).abs() < 1e-6);
        assert_eq!(out, grayscale(&img));
    }

    #[test]
    fn color_boost_clamps() {
        let img = Rgb32FImage::from_pixel(1, 1, Rgb([1.0, 0.0, 0.0]));
        let out = color(&img, 2.0);
        assert_eq!(px(&out, 0, 0)[0], 1.0);
        assert_eq!(px(&out, 0, 0)[1], 0.0);
    }

    #[test]
    fn brightness_scales_from_black() {
        let out = brightness(&two_tone(), 1.5);
        assert!((px(&out, 0, 0)[2] - 0.3).abs() < 1e-6);
        assert!((px(&out, 1, 0)[2] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn factor_one_is_identity() {
        let img = two_tone();
        assert_eq!(color(&img, 1.0), img);
        assert_eq!(contrast(&img, 1.0), img);
        assert_eq!(brightness(&img, 1.0), img);
    }

    #[test]
    fn blend_endpoints() {
        let a = two_tone();
        let b = Rgb32FImage::from_pixel(2, 1, Rgb([1.0, 0.0, 0.5]));
        assert_eq!(blend(&a, &b, 0.0), a);
        assert_eq!(blend(&a, &b, 1.0), b);
        assert_eq!(blend_flat(&a, [1.0, 0.0, 0.5], 1.0), b);
    }
}
