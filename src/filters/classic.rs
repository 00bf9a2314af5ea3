//! The four original looks: black & white, vivid, retro and basic film.
//!
//! Below strength 0.5 the black & white and retro looks fade in from the
//! original; above 0.5 they keep the full look and push extra contrast,
//! color or warmth by `extra = (s − 0.5) / 0.5`.

use super::enhance::{blend, blend_flat, brightness, color, contrast, grayscale};
use super::grain::flat_noise;
use super::tone::{clamp_px, clamp01, map_pixels, matrix, rgb8, scale_factor};
use image::Rgb32FImage;
use rand::rngs::StdRng;

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

fn extra(s: f32) -> f32 {
    (s - 0.5) / 0.5
}

pub fn black_white(image: &Rgb32FImage, strength: f32) -> Rgb32FImage {
    let s = clamp01(strength);
    let gray = grayscale(image);
    if s < 0.5 {
        blend(image, &gray, s / 0.5)
    } else {
        contrast(&gray, black_white_contrast(s))
    }
}

/// Contrast applied on top of full desaturation: 1 at s = 0.5, 1.2 at s = 1.
pub fn black_white_contrast(strength: f32) -> f32 {
    1.0 + 0.2 * extra(clamp01(strength).max(0.5))
}

pub fn vivid(image: &Rgb32FImage, strength: f32) -> Rgb32FImage {
    let out = color(image, scale_factor(1.5, strength));
    let out = contrast(&out, scale_factor(1.2, strength));
    brightness(&out, scale_factor(1.03, strength))
}

pub fn retro(image: &Rgb32FImage, strength: f32) -> Rgb32FImage {
    let s = clamp01(strength);
    let sepia = map_pixels(image, |p| clamp_px(matrix(p, &SEPIA)));
    let sepia = contrast(&sepia, 0.95);
    let sepia = color(&sepia, 1.05);

    if s < 0.5 {
        return blend(image, &sepia, s / 0.5);
    }
    let extra = extra(s);
    let warm = blend_flat(&sepia, rgb8(255, 235, 200), 0.08 * extra);
    let warm = color(&warm, 1.0 + 0.1 * extra);
    contrast(&warm, 1.0 + 0.05 * extra)
}

/// Monochrome noise, a slight contrast pull-down and a pale green-gray tint.
pub fn film(image: &Rgb32FImage, strength: f32, rng: &mut StdRng) -> Rgb32FImage {
    let k = clamp01(strength) / 0.5;
    let out = flat_noise(image, 6.0 / 255.0 * k, rng);
    let out = contrast(&out, 1.0 - 0.02 * k);
    blend_flat(&out, rgb8(220, 235, 225), 0.04 * k)
}
