//! Film grain.
//!
//! Gaussian samples come from Box–Muller over the caller's generator, so a
//! seeded `StdRng` reproduces the same grain byte for byte.

use super::tone::{clamp_px, clamp01, luminance};
use image::Rgb32FImage;
use rand::Rng;
use rand::rngs::StdRng;

/// Low-resolution grid factor for film-stock grain.
pub const GRAIN_DOWNSAMPLE: u32 = 4;

/// One standard-normal sample scaled by `sigma`.
pub fn gaussian(rng: &mut StdRng, sigma: f32) -> f32 {
    // 1 - u keeps the log argument in (0, 1]
    let u1: f32 = 1.0 - rng.r#gen::<f32>();
    let u2: f32 = rng.r#gen::<f32>();
    sigma * (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
}

/// Parameters of one stock's grain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainSpec {
    /// Luminance where grain is strongest.
    pub mid: f32,
    pub sigma_base: f32,
    pub sigma_slope: f32,
    pub channel_weights: [f32; 3],
}

impl GrainSpec {
    pub fn sigma(&self, strength: f32) -> f32 {
        self.sigma_base + self.sigma_slope * strength
    }
}

/// Mosaic grain: noise drawn on a grid `GRAIN_DOWNSAMPLE` times coarser,
/// block-repeated back to full size, weighted toward mid-tones and tinted
/// per channel.
pub fn film_grain(image: &Rgb32FImage, strength: f32, spec: &GrainSpec, rng: &mut StdRng) -> Rgb32FImage {
    if strength <= 0.0 {
        return image.clone();
    }
    let (w, h) = image.dimensions();
    let lw = (w / GRAIN_DOWNSAMPLE).max(1);
    let lh = (h / GRAIN_DOWNSAMPLE).max(1);
    let rep_w = w.div_ceil(lw);
    let rep_h = h.div_ceil(lh);
    let sigma = spec.sigma(strength);

    let coarse: Vec<f32> = (0..lw * lh).map(|_| gaussian(rng, sigma)).collect();

    let mut out = image.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        let n = coarse[((y / rep_h) * lw + x / rep_w) as usize];
        let weight = 1.0 - clamp01((luminance(px.0) - spec.mid).abs() * 2.0);
        let n = n * weight;
        px.0 = clamp_px([
            px.0[0] + n * spec.channel_weights[0],
            px.0[1] + n * spec.channel_weights[1],
            px.0[2] + n * spec.channel_weights[2],
        ]);
    }
    out
}

/// Full-resolution monochrome noise, identical on all three channels.
pub fn flat_noise(image: &Rgb32FImage, sigma: f32, rng: &mut StdRng) -> Rgb32FImage {
    if sigma <= 0.0 {
        return image.clone();
    }
    let mut out = image.clone();
    for px in out.pixels_mut() {
        let n = gaussian(rng, sigma);
        px.0 = clamp_px(px.0.map(|c| c + n));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::SeedableRng;

    const SPEC: GrainSpec = GrainSpec {
        mid: 0.5,
        sigma_base: 0.06,
        sigma_slope: 0.08,
        channel_weights: [0.95, 1.0, 1.18],
    };

    #[test]
    fn gaussian_has_roughly_unit_spread() {
        let mut rng = StdRng::seed_from_u64(11);
        let samples: Vec<f32> = (0..20_000).map(|_| gaussian(&mut rng, 1.0)).collect();
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / samples.len() as f32;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.1, "variance {var}");
    }

    #[test]
    fn grain_is_blocky() {
        let img = Rgb32FImage::from_pixel(16, 16, Rgb([0.5, 0.5, 0.5]));
        let out = film_grain(&img, 1.0, &SPEC, &mut StdRng::seed_from_u64(3));
        // 16 / 4 = 4 coarse cells per axis, each 4×4 pixels
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.get_pixel(x, y), out.get_pixel(0, 0));
            }
        }
        let corners: Vec<_> = (0..4)
            .flat_map(|cy| (0..4).map(move |cx| (cx * 4, cy * 4)))
            .map(|(x, y)| *out.get_pixel(x, y))
            .collect();
        assert!(corners.iter().any(|p| p != &corners[0]));
    }

    #[test]
    fn grain_spares_pure_black_and_white() {
        let img = Rgb32FImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgb([0.0, 0.0, 0.0])
            } else {
                Rgb([1.0, 1.0, 1.0])
            }
        });
        let out = film_grain(&img, 1.0, &SPEC, &mut StdRng::seed_from_u64(5));
        for (a, b) in out.pixels().zip(img.pixels()) {
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn seeded_grain_is_reproducible() {
        let img = Rgb32FImage::from_pixel(9, 7, Rgb([0.4, 0.5, 0.6]));
        let a = film_grain(&img, 0.7, &SPEC, &mut StdRng::seed_from_u64(42));
        let b = film_grain(&img, 0.7, &SPEC, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn tiny_images_use_one_cell() {
        let img = Rgb32FImage::from_pixel(3, 2, Rgb([0.5, 0.5, 0.5]));
        let out = film_grain(&img, 1.0, &SPEC, &mut StdRng::seed_from_u64(1));
        assert!(out.pixels().all(|p| p == out.get_pixel(0, 0)));
    }

    #[test]
    fn flat_noise_is_monochrome() {
        let img = Rgb32FImage::from_pixel(5, 5, Rgb([0.5, 0.5, 0.5]));
        let out = flat_noise(&img, 0.05, &mut StdRng::seed_from_u64(9));
        assert!(out.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
        assert_ne!(out, img);
    }
}
