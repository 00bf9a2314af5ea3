//! Film-stock emulations.
//!
//! Every stock is a fixed chain of stages whose magnitudes scale with the
//! strength `s`: a saturation pre-pass, tone-region masks on BT.709
//! luminance, curve and tint work inside those regions, then mosaic grain
//! (and for 5219 a vignette).

use super::enhance::color;
use super::grain::{GrainSpec, film_grain};
use super::tone::{
    Px, clamp_px, clamp01, contrast_about, dominance, luminance, map_pixels, mask_above,
    mask_below, matrix, mix, multiply, rgb8, scale_factor, toward_gray, vignette, yellow_mask,
};
use image::Rgb32FImage;
use rand::rngs::StdRng;

/// 5219 vignette: inner radius, falloff width, amount.
const VIGNETTE_5219: [f32; 3] = [0.2, 0.8, 0.45];

/// Film stocks with a dedicated emulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilmStock {
    /// Kodak Vision3 5219: rolled-off highlights, lifted toe, vignette.
    Kodak5219,
    /// Kodak Ektachrome E100: clean slide look with blue emphasis.
    KodakE100,
    /// Fujifilm C100: contrasty and cool with emphasized greens.
    FujiC100,
    /// Kodak Gold 200: warm highlights, rich reds and yellows.
    KodakG200,
}

impl FilmStock {
    pub const ALL: [FilmStock; 4] = [
        FilmStock::Kodak5219,
        FilmStock::KodakE100,
        FilmStock::FujiC100,
        FilmStock::KodakG200,
    ];

    pub fn grain(self) -> GrainSpec {
        match self {
            FilmStock::Kodak5219 => GrainSpec {
                mid: 0.5,
                sigma_base: 0.06,
                sigma_slope: 0.08,
                channel_weights: [0.95, 1.00, 1.18],
            },
            FilmStock::KodakE100 => GrainSpec {
                mid: 0.5,
                sigma_base: 0.008,
                sigma_slope: 0.015,
                channel_weights: [0.98, 1.00, 1.05],
            },
            FilmStock::FujiC100 => GrainSpec {
                mid: 0.55,
                sigma_base: 0.016,
                sigma_slope: 0.024,
                channel_weights: [0.96, 1.00, 1.08],
            },
            FilmStock::KodakG200 => GrainSpec {
                mid: 0.5,
                sigma_base: 0.02,
                sigma_slope: 0.03,
                channel_weights: [1.02, 1.00, 0.98],
            },
        }
    }

    fn saturation_baseline(self) -> f32 {
        match self {
            FilmStock::Kodak5219 => 0.80,
            FilmStock::KodakE100 => 0.95,
            FilmStock::FujiC100 => 0.90,
            FilmStock::KodakG200 => 1.08,
        }
    }

    /// Run the full emulation. Strength is clamped; 0 returns the input.
    pub fn apply(self, image: &Rgb32FImage, strength: f32, rng: &mut StdRng) -> Rgb32FImage {
        let s = clamp01(strength);
        if s <= 0.0 {
            return image.clone();
        }
        let base = color(image, scale_factor(self.saturation_baseline(), s));
        let toned = match self {
            FilmStock::Kodak5219 => map_pixels(&base, |p| kodak_5219(p, s)),
            FilmStock::KodakE100 => map_pixels(&base, |p| kodak_e100(p, s)),
            FilmStock::FujiC100 => map_pixels(&base, |p| fuji_c100(p, s)),
            FilmStock::KodakG200 => map_pixels(&base, |p| kodak_g200(p, s)),
        };
        let grained = film_grain(&toned, s, &self.grain(), rng);
        match self {
            FilmStock::Kodak5219 => {
                let [inner, outer, amount] = VIGNETTE_5219;
                vignette(&grained, s, inner, outer, amount)
            }
            _ => grained,
        }
    }
}

/// Scale all channels so luminance moves from `from` to `to`.
#[inline]
fn rescale_luma(p: Px, from: f32, to: f32) -> Px {
    let k = to / (from + 1e-6);
    p.map(|c| c * k)
}

fn kodak_5219(p: Px, s: f32) -> Px {
    let l = luminance(p);
    let hl = mask_above(l, 0.55, 0.45);
    let sh = mask_below(l, 0.35, 0.35);

    // Highlight roll-off, only inside the highlight mask
    let rolled = l / (1.0 + 1.4 * s * l);
    let l_new = l * (1.0 - hl) + rolled * hl;
    let p = rescale_luma(p, l, l_new);

    // Toe: pull shadows down a touch
    let l_toe = l_new - 0.28 * s * sh * (1.0 - l_new) * l_new;
    let p = rescale_luma(p, l_new, l_toe);

    let p = toward_gray(p, l_new, 0.18 * s * hl);
    let p = mix(p, rgb8(240, 245, 220), 0.24 * s * hl);
    let p = mix(p, rgb8(230, 200, 235), 0.16 * s * sh);

    let skew = [
        [1.0, -0.030 * s, 0.0],
        [-0.015 * s, 1.0, 0.0],
        [0.0, -0.015 * s, 1.0],
    ];
    clamp_px(matrix(p, &skew))
}

fn kodak_e100(p: Px, s: f32) -> Px {
    let hl = mask_above(luminance(p), 0.55, 0.45);

    let p = contrast_about(p, 1.0 + 0.25 * s, 0.5);
    let mut p = clamp_px(multiply(p, [1.0 - 0.020 * s, 1.0 - 0.005 * s, 1.0 + 0.060 * s]));
    p[0] = clamp01(p[0] * (1.0 - 0.06 * s * hl));

    let blue = dominance(p[2], p[0], p[1], 2.0);
    let mut p = toward_gray(p, luminance(p), 0.06 * s * (1.0 - blue));
    p[2] = clamp01(p[2] * (1.0 + 0.28 * s * blue));

    let l3 = luminance(p);
    let hl3 = mask_above(l3, 0.55, 0.45);
    let sh3 = mask_below(l3, 0.45, 0.45);
    let p = clamp_px(contrast_about(p, 1.0 + 0.20 * s, 0.5));
    let p = clamp_px(p.map(|c| c * (1.0 + 0.10 * s * hl3)));
    clamp_px(p.map(|c| c * (1.0 - 0.10 * s * sh3)))
}

fn fuji_c100(p: Px, s: f32) -> Px {
    let sh = mask_below(luminance(p), 0.40, 0.40);

    let p = contrast_about(p, 1.0 + 0.44 * s, 0.5);
    let p = clamp_px(multiply(p, [1.0 - 0.040 * s, 1.0, 1.0 + 0.100 * s]));

    let green = dominance(p[1], p[0], p[2], 2.0);
    let p = clamp_px([
        p[0] * (1.0 - 0.10 * s * green),
        p[1] * (1.0 + 0.56 * s * green),
        p[2] * (1.0 - 0.06 * s * green),
    ]);
    let p = toward_gray(p, luminance(p), 0.16 * s * (1.0 - green));

    let hl3 = mask_above(luminance(p), 0.55, 0.45);
    let p = clamp_px(p.map(|c| c * (1.0 + 0.24 * s * hl3) + 0.12 * s * hl3));
    let p = toward_gray(p, luminance(p), 0.20 * s * hl3);

    clamp_px(mix(p, rgb8(185, 215, 185), 0.32 * s * sh))
}

fn kodak_g200(p: Px, s: f32) -> Px {
    let l = luminance(p);
    let hl = mask_above(l, 0.55, 0.45);
    let sh = mask_below(l, 0.35, 0.35);

    // Contrast that leaves highlights alone
    let p = contrast_about(p, 1.0 + 0.25 * s * (1.0 - hl), 0.5);
    let p = clamp_px(multiply(p, [1.0 + 0.06 * s, 1.0 + 0.03 * s, 1.0 - 0.02 * s]));

    let hl2 = mask_above(luminance(p), 0.5, 0.5);
    let warm = [1.0 + 0.10 * s, 1.0 + 0.06 * s, 1.0 - 0.02 * s];
    let p = clamp_px(multiply(p, warm.map(|g| 1.0 + (g - 1.0) * hl2)));
    let p = clamp_px(p.map(|c| c * (1.0 + 0.12 * s * hl2) + 0.05 * s * hl2));
    let p = mix(p, rgb8(210, 180, 160), 0.18 * s * sh);

    let red = dominance(p[0], p[1], p[2], 1.0);
    let boost_red = 0.25 * s * red;
    let boost_yellow = 0.22 * s * yellow_mask(p);
    clamp_px([
        p[0] * (1.0 + boost_red + 0.5 * boost_yellow),
        p[1] * (1.0 + 0.8 * boost_yellow),
        p[2],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tone::to_float;
    use crate::test_helpers::gradient;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    #[test]
    fn zero_strength_is_identity_for_every_stock() {
        let img = to_float(&gradient(12, 9));
        for stock in FilmStock::ALL {
            assert_eq!(stock.apply(&img, 0.0, &mut rng()), img, "{stock:?}");
        }
    }

    #[test]
    fn stocks_change_the_image_and_stay_in_range() {
        let img = to_float(&gradient(16, 12));
        for stock in FilmStock::ALL {
            let out = stock.apply(&img, 0.7, &mut rng());
            assert_ne!(out, img, "{stock:?}");
            assert!(
                out.pixels().all(|p| p.0.iter().all(|c| (0.0..=1.0).contains(c))),
                "{stock:?} left [0, 1]"
            );
        }
    }

    #[test]
    fn seeded_runs_are_identical() {
        let img = to_float(&gradient(10, 10));
        for stock in FilmStock::ALL {
            assert_eq!(
                stock.apply(&img, 1.0, &mut rng()),
                stock.apply(&img, 1.0, &mut rng())
            );
        }
    }

    #[test]
    fn kodak_5219_rolls_off_highlights() {
        let white = [0.95, 0.95, 0.95];
        let out = kodak_5219(white, 1.0);
        assert!(luminance(out) < luminance(white));
        // Mid-dark pixels outside both masks are only touched by the skew matrix
        let mid = [0.45, 0.45, 0.45];
        let out = kodak_5219(mid, 1.0);
        assert!((out[1] - mid[1] * (1.0 - 0.015)).abs() < 1e-4);
    }

    #[test]
    fn fuji_c100_emphasizes_green() {
        let leaf = [0.3, 0.6, 0.3];
        let out = fuji_c100(leaf, 1.0);
        assert!(out[1] - out[0] > leaf[1] - leaf[0]);
    }

    #[test]
    fn kodak_g200_warms_reds() {
        let brick = [0.7, 0.3, 0.25];
        let out = kodak_g200(brick, 1.0);
        assert!(out[0] > brick[0]);
        assert!(out[2] <= brick[2] + 1e-6);
    }

    #[test]
    fn kodak_e100_boosts_blue_sky() {
        let sky = [0.3, 0.45, 0.8];
        let out = kodak_e100(sky, 1.0);
        assert!(out[2] > sky[2]);
    }

    fn assert_px(actual: Px, expected: Px, what: &str) {
        for c in 0..3 {
            assert!(
                (actual[c] - expected[c]).abs() < 1e-3,
                "{what}: {actual:?} vs {expected:?}"
            );
        }
    }

    #[test]
    fn saturation_pre_pass_hits_its_baseline_at_half_strength() {
        let expected = [
            (FilmStock::Kodak5219, 0.80),
            (FilmStock::KodakE100, 0.95),
            (FilmStock::FujiC100, 0.90),
            (FilmStock::KodakG200, 1.08),
        ];
        for (stock, baseline) in expected {
            assert_eq!(stock.saturation_baseline(), baseline, "{stock:?}");
            let at_half = scale_factor(stock.saturation_baseline(), 0.5);
            assert!((at_half - baseline).abs() < 1e-6, "{stock:?}");
            let at_full = scale_factor(stock.saturation_baseline(), 1.0);
            assert!((at_full - (2.0 * baseline - 1.0)).abs() < 1e-6, "{stock:?}");
        }
    }

    #[test]
    fn grain_constants() {
        let sigmas: Vec<(f32, f32)> = FilmStock::ALL
            .iter()
            .map(|s| (s.grain().sigma_base, s.grain().sigma_slope))
            .collect();
        assert_eq!(
            sigmas,
            vec![(0.06, 0.08), (0.008, 0.015), (0.016, 0.024), (0.02, 0.03)]
        );
        assert_eq!(FilmStock::FujiC100.grain().mid, 0.55);
        assert_eq!(FilmStock::Kodak5219.grain().channel_weights, [0.95, 1.00, 1.18]);
        assert_eq!(FilmStock::KodakG200.grain().channel_weights, [1.02, 1.00, 0.98]);
    }

    // Reference values at s = 0.5, computed stage by stage.

    #[test]
    fn kodak_5219_reference_pixels() {
        // Highlight: roll-off a = 1.4, desaturation 0.18, tint alpha 0.24
        assert_px(kodak_5219([0.9, 0.8, 0.7], 0.5), [0.71158, 0.64806, 0.57237], "highlight");
        // Shadow: toe 0.28, shadow tint alpha 0.16
        assert_px(kodak_5219([0.2, 0.15, 0.1], 0.5), [0.21599, 0.16701, 0.12875], "shadow");
    }

    #[test]
    fn kodak_e100_reference_pixel() {
        assert_px(kodak_e100([0.3, 0.45, 0.8], 0.5), [0.24935, 0.43668, 0.9995], "sky");
    }

    #[test]
    fn fuji_c100_reference_pixel() {
        assert_px(fuji_c100([0.3, 0.6, 0.3], 0.5), [0.26535, 0.76167, 0.2861], "leaf");
    }

    #[test]
    fn kodak_g200_reference_pixel() {
        assert_px(kodak_g200([0.7, 0.5, 0.3], 0.5), [0.79964, 0.5241, 0.27544], "brick");
    }

    #[test]
    fn kodak_5219_vignette_darkens_corners_only() {
        assert_eq!(VIGNETTE_5219, [0.2, 0.8, 0.45]);
        let [inner, outer, amount] = VIGNETTE_5219;
        let img = Rgb32FImage::from_pixel(41, 41, image::Rgb([0.5, 0.5, 0.5]));
        let out = vignette(&img, 0.5, inner, outer, amount);
        assert_eq!(out.get_pixel(20, 20).0, [0.5; 3]);
        // The corner sits past inner + outer, so the mask is saturated
        let corner = out.get_pixel(0, 0).0[0];
        assert!((corner - 0.5 * (1.0 - 0.45 * 0.5)).abs() < 1e-3, "{corner}");
    }
}
