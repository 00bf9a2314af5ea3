//! Color grading: strength-controlled looks, film-stock emulation and cube LUTs.
//!
//! [`FilterEngine::apply`] is the entry point. It takes any decoded image, a
//! case-insensitive filter key and a strength in `[0, 1]` and always returns
//! an RGB image:
//!
//! - an unknown key is the identity (after RGB conversion), never an error;
//! - strength 0 is the identity for every filter;
//! - strength 0.5 is each look's calibrated baseline;
//! - any failure inside a filter (a missing cube file, a panic) is logged
//!   and the RGB input is returned instead.
//!
//! | Key | Look |
//! |---|---|
//! | `none` | pass-through |
//! | `black_white` | desaturate, then extra contrast |
//! | `vivid` | saturation, contrast, brightness |
//! | `retro` | sepia with a warm tint |
//! | `film` | monochrome noise, soft contrast, pale tint |
//! | `film_kodak_5219`, `film_kodak_e100`, `film_fuji_c100`, `film_kodak_g200` | film stocks |
//! | `lut01` .. `lut15` | `Titanium_Cinematic_NN.cube` from the LUT directory |

pub mod classic;
pub mod enhance;
pub mod film_stock;
pub mod grain;
pub mod tone;

use crate::config::FilterConfig;
use crate::lut::{LutCache, LutError, apply_lut};
use film_stock::FilmStock;
use image::{DynamicImage, RgbImage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Number of bundled cinematic cube slots (`lut01` .. `lut15`).
pub const LUT_SLOTS: u8 = 15;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("LUT unavailable: {0}")]
    Lut(#[from] LutError),
    #[error("filter panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    None,
    BlackWhite,
    Vivid,
    Retro,
    Film,
    Stock(FilmStock),
    /// One of the numbered cube slots, 1-based.
    Lut(u8),
}

impl FilterKey {
    /// Look up a key, ignoring case and surrounding whitespace.
    pub fn lookup(key: &str) -> Option<FilterKey> {
        let key = key.trim().to_ascii_lowercase();
        let found = match key.as_str() {
            "" | "none" => FilterKey::None,
            "black_white" => FilterKey::BlackWhite,
            "vivid" => FilterKey::Vivid,
            "retro" => FilterKey::Retro,
            "film" => FilterKey::Film,
            "film_kodak_5219" => FilterKey::Stock(FilmStock::Kodak5219),
            "film_kodak_e100" => FilterKey::Stock(FilmStock::KodakE100),
            "film_fuji_c100" => FilterKey::Stock(FilmStock::FujiC100),
            "film_kodak_g200" => FilterKey::Stock(FilmStock::KodakG200),
            other => {
                let slot: u8 = other.strip_prefix("lut")?.parse().ok()?;
                // Slots are always written with two digits
                if other.len() != 5 || !(1..=LUT_SLOTS).contains(&slot) {
                    return None;
                }
                FilterKey::Lut(slot)
            }
        };
        Some(found)
    }

    /// Resolve a key the way the engine does: unknown keys become `None`.
    pub fn resolve(key: &str) -> FilterKey {
        FilterKey::lookup(key).unwrap_or_else(|| {
            debug!(key, "unknown filter key, passing image through");
            FilterKey::None
        })
    }

    /// Every registered key, in display order.
    pub fn all() -> Vec<FilterKey> {
        let mut keys = vec![
            FilterKey::None,
            FilterKey::BlackWhite,
            FilterKey::Vivid,
            FilterKey::Retro,
            FilterKey::Film,
        ];
        keys.extend(FilmStock::ALL.into_iter().map(FilterKey::Stock));
        keys.extend((1..=LUT_SLOTS).map(FilterKey::Lut));
        keys
    }

    pub fn description(&self) -> &'static str {
        match self {
            FilterKey::None => "no change",
            FilterKey::BlackWhite => "black & white with extra contrast",
            FilterKey::Vivid => "punchier color and contrast",
            FilterKey::Retro => "warm sepia",
            FilterKey::Film => "fine monochrome grain and a pale tint",
            FilterKey::Stock(FilmStock::Kodak5219) => "Kodak Vision3 5219 cinema stock",
            FilterKey::Stock(FilmStock::KodakE100) => "Kodak Ektachrome E100 slide film",
            FilterKey::Stock(FilmStock::FujiC100) => "Fujifilm C100, cool with strong greens",
            FilterKey::Stock(FilmStock::KodakG200) => "Kodak Gold 200, warm consumer film",
            FilterKey::Lut(_) => "cinematic cube LUT",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKey::None => f.write_str("none"),
            FilterKey::BlackWhite => f.write_str("black_white"),
            FilterKey::Vivid => f.write_str("vivid"),
            FilterKey::Retro => f.write_str("retro"),
            FilterKey::Film => f.write_str("film"),
            FilterKey::Stock(FilmStock::Kodak5219) => f.write_str("film_kodak_5219"),
            FilterKey::Stock(FilmStock::KodakE100) => f.write_str("film_kodak_e100"),
            FilterKey::Stock(FilmStock::FujiC100) => f.write_str("film_fuji_c100"),
            FilterKey::Stock(FilmStock::KodakG200) => f.write_str("film_kodak_g200"),
            FilterKey::Lut(n) => write!(f, "lut{n:02}"),
        }
    }
}

/// Applies filters to images. Holds the shared LUT cache and grain seed.
///
/// Cheap to clone; clones share the cache.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    luts: Arc<LutCache>,
    lut_dir: PathBuf,
    seed: Option<u64>,
}

impl FilterEngine {
    pub fn new(lut_dir: impl Into<PathBuf>) -> Self {
        Self {
            luts: Arc::new(LutCache::new()),
            lut_dir: lut_dir.into(),
            seed: None,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(&config.lut_dir).with_seed(config.grain_seed)
    }

    /// Fix the grain generator so repeated runs are byte-identical.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Share a LUT cache with other engines.
    pub fn with_cache(mut self, cache: Arc<LutCache>) -> Self {
        self.luts = cache;
        self
    }

    pub fn lut_path(&self, slot: u8) -> PathBuf {
        self.lut_dir
            .join(format!("Titanium_Cinematic_{slot:02}.cube"))
    }

    /// Apply the filter named `key`. Never fails: see the module docs.
    pub fn apply(&self, image: &DynamicImage, key: &str, strength: f32) -> RgbImage {
        self.apply_key(&image.to_rgb8(), FilterKey::resolve(key), strength)
    }

    pub fn apply_key(&self, image: &RgbImage, key: FilterKey, strength: f32) -> RgbImage {
        let strength = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if key == FilterKey::None || strength <= 0.0 {
            return image.clone();
        }

        let outcome = catch_unwind(AssertUnwindSafe(|| self.run(image, key, strength)))
            .unwrap_or_else(|payload| Err(FilterError::Panicked(panic_message(payload.as_ref()))));

        match outcome {
            Ok(out) => out,
            Err(e) => {
                warn!(filter = %key, error = %e, "filter failed, returning unfiltered image");
                image.clone()
            }
        }
    }

    fn run(&self, image: &RgbImage, key: FilterKey, s: f32) -> Result<RgbImage, FilterError> {
        let input = tone::to_float(image);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let out = match key {
            FilterKey::None => input,
            FilterKey::BlackWhite => classic::black_white(&input, s),
            FilterKey::Vivid => classic::vivid(&input, s),
            FilterKey::Retro => classic::retro(&input, s),
            FilterKey::Film => classic::film(&input, s, &mut rng),
            FilterKey::Stock(stock) => stock.apply(&input, s, &mut rng),
            FilterKey::Lut(slot) => {
                let lut = self.luts.get_or_load(&self.lut_path(slot))?;
                apply_lut(&input, &lut, s)
            }
        };
        Ok(tone::to_u8(&out))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient, identity_rows, max_channel_diff, uniform, write_cube};
    use image::{GrayImage, Luma, Rgb};
    use tempfile::TempDir;

    fn engine() -> FilterEngine {
        FilterEngine::new("/nonexistent/cubes").with_seed(Some(17))
    }

    #[test]
    fn keys_are_case_and_space_insensitive() {
        assert_eq!(FilterKey::lookup(" Vivid "), Some(FilterKey::Vivid));
        assert_eq!(
            FilterKey::lookup("FILM_KODAK_G200"),
            Some(FilterKey::Stock(FilmStock::KodakG200))
        );
        assert_eq!(FilterKey::lookup("lut07"), Some(FilterKey::Lut(7)));
        assert_eq!(FilterKey::lookup("lut16"), None);
        assert_eq!(FilterKey::lookup("lut7"), None);
        assert_eq!(FilterKey::lookup("sparkle"), None);
        assert_eq!(FilterKey::resolve("sparkle"), FilterKey::None);
    }

    #[test]
    fn every_key_round_trips_through_its_name() {
        let all = FilterKey::all();
        assert_eq!(all.len(), 5 + 4 + 15);
        for key in all {
            assert_eq!(FilterKey::lookup(&key.to_string()), Some(key));
        }
    }

    #[test]
    fn unknown_key_returns_rgb_input() {
        let gray = GrayImage::from_fn(6, 4, |x, y| Luma([(x * 30 + y * 5) as u8]));
        let input = DynamicImage::ImageLuma8(gray);
        let out = engine().apply(&input, "no_such_filter", 1.0);
        assert_eq!(out, input.to_rgb8());
    }

    #[test]
    fn zero_strength_is_identity_for_all_filters() {
        let img = gradient(9, 7);
        let dynamic = DynamicImage::ImageRgb8(img.clone());
        for key in FilterKey::all() {
            assert_eq!(engine().apply(&dynamic, &key.to_string(), 0.0), img, "{key}");
        }
    }

    #[test]
    fn grayscale_scenario_on_uniform_red() {
        let red = DynamicImage::ImageRgb8(uniform(10, 10, [255, 0, 0]));
        let out = engine().apply(&red, "black_white", 1.0);
        assert!(out.pixels().all(|p| *p == Rgb([76, 76, 76])));
    }

    #[test]
    fn vivid_half_strength_matches_baseline_factors() {
        let img = gradient(8, 6);
        let out = engine().apply_key(&img, FilterKey::Vivid, 0.5);

        let f = tone::to_float(&img);
        let expected = enhance::brightness(&enhance::contrast(&enhance::color(&f, 1.5), 1.2), 1.03);
        assert_eq!(out, tone::to_u8(&expected));
    }

    #[test]
    fn strength_is_clamped() {
        let img = gradient(8, 8);
        assert_eq!(
            engine().apply_key(&img, FilterKey::Retro, 4.0),
            engine().apply_key(&img, FilterKey::Retro, 1.0)
        );
        assert_eq!(engine().apply_key(&img, FilterKey::Retro, f32::NAN), img);
    }

    #[test]
    fn seeded_engine_is_deterministic() {
        let img = gradient(20, 14);
        for key in [FilterKey::Film, FilterKey::Stock(FilmStock::Kodak5219)] {
            let a = engine().apply_key(&img, key, 0.9);
            let b = engine().apply_key(&img, key, 0.9);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn missing_lut_falls_back_to_input() {
        let img = gradient(5, 5);
        let out = engine().apply_key(&img, FilterKey::Lut(3), 1.0);
        assert_eq!(out, img);
    }

    #[test]
    fn lut_slot_reads_named_cube() {
        let tmp = TempDir::new().unwrap();
        // Swap red and blue
        let rows: Vec<[f32; 3]> = identity_rows(2)
            .into_iter()
            .map(|[r, g, b]| [b, g, r])
            .collect();
        write_cube(tmp.path(), "Titanium_Cinematic_02.cube", "LUT_3D_SIZE 2\n", &rows);

        let engine = FilterEngine::new(tmp.path());
        let img = uniform(4, 4, [200, 100, 20]);
        let out = engine.apply_key(&img, FilterKey::Lut(2), 1.0);
        assert!(max_channel_diff(&out, &uniform(4, 4, [20, 100, 200])) <= 1);

        // Half strength lands halfway
        let half = engine.apply_key(&img, FilterKey::Lut(2), 0.5);
        assert!(max_channel_diff(&half, &uniform(4, 4, [110, 100, 110])) <= 1);
    }

    #[test]
    fn clones_share_the_lut_cache() {
        let tmp = TempDir::new().unwrap();
        write_cube(
            tmp.path(),
            "Titanium_Cinematic_01.cube",
            "LUT_3D_SIZE 2\n",
            &identity_rows(2),
        );
        let cache = Arc::new(LutCache::new());
        let a = FilterEngine::new(tmp.path()).with_cache(Arc::clone(&cache));
        let b = a.clone();

        let img = gradient(3, 3);
        a.apply_key(&img, FilterKey::Lut(1), 1.0);
        b.apply_key(&img, FilterKey::Lut(1), 1.0);
        assert_eq!(cache.len(), 1);
    }
}
