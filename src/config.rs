//! Studio configuration module.
//!
//! Handles loading, validating, and merging `filmframe.toml`. Stock defaults
//! are the base layer; the user file only needs the keys it wants to change.
//! Unknown keys are rejected so typos fail loudly instead of being ignored.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [render]
//! target_size = 2400        # Width the photo is scaled to inside the frame
//! border = true             # Thin black border around the photo
//! square = false            # Pad the finished canvas to a square
//! layout = "basic3"         # basic1 | basic2 | basic3 | format_none
//! quality = 90              # JPEG quality (1-100)
//!
//! [filters]
//! lut_dir = "cubes"         # Where lut01..lut15 cube files live
//! strength = 0.5            # Default filter strength (0-1)
//! # grain_seed = 7          # Fix grain noise for reproducible output
//!
//! [fonts]
//! regular = "fonts/caption.ttf"
//!
//! [logos]                   # Camera make (as written in EXIF) -> logo file
//! FUJIFILM = "logos/fujifilm.png"
//!
//! [film_logos]              # Film stock name -> logo file
//! "Kodak Gold 200" = "films/kodak-gold-200.jpg"
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::compose::LayoutKey;

/// File name looked up in the config directory.
pub const CONFIG_FILE: &str = "filmframe.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("unknown layout '{0}' (expected basic1, basic2, basic3 or format_none)")]
    UnknownLayout(String),
}

/// Studio configuration loaded from `filmframe.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Canvas sizing and layout choice.
    pub render: RenderConfig,
    /// Filter defaults and LUT location.
    pub filters: FilterConfig,
    /// Caption font.
    pub fonts: FontConfig,
    /// Camera make to logo path.
    pub logos: BTreeMap<String, String>,
    /// Film stock name to logo path.
    pub film_logos: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub target_size: u32,
    pub border: bool,
    pub square: bool,
    pub layout: String,
    pub quality: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            target_size: 2400,
            border: true,
            square: false,
            layout: "basic3".to_string(),
            quality: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub lut_dir: String,
    pub strength: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grain_seed: Option<u64>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            lut_dir: "cubes".to_string(),
            strength: 0.5,
            grain_seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    pub regular: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: "fonts/caption.ttf".to_string(),
        }
    }
}

impl StudioConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.target_size == 0 {
            return Err(ConfigError::Validation(
                "render.target_size must be positive".into(),
            ));
        }
        if !(1..=100).contains(&self.render.quality) {
            return Err(ConfigError::Validation(
                "render.quality must be 1-100".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.filters.strength) {
            return Err(ConfigError::Validation(
                "filters.strength must be between 0 and 1".into(),
            ));
        }
        self.layout()?;
        Ok(())
    }

    pub fn layout(&self) -> Result<LayoutKey, ConfigError> {
        self.render.layout.parse()
    }

    /// Logo for a camera make. EXIF makes vary in case and padding
    /// ("NIKON CORPORATION" vs "Nikon"), so an exact key wins and a
    /// case-insensitive match is the fallback.
    pub fn logo_for_make(&self, make: &str) -> Option<&str> {
        let make = make.trim();
        self.logos
            .get(make)
            .or_else(|| {
                self.logos
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(make))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    /// A film logo reference is either a `[film_logos]` name or a path.
    pub fn film_logo(&self, reference: &str) -> PathBuf {
        PathBuf::from(
            self.film_logos
                .get(reference)
                .map(String::as_str)
                .unwrap_or(reference),
        )
    }

    /// Make every relative path absolute against `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let join = |p: &mut String| {
            if Path::new(p.as_str()).is_relative() {
                *p = base.join(p.as_str()).to_string_lossy().into_owned();
            }
        };
        join(&mut self.filters.lut_dir);
        join(&mut self.fonts.regular);
        self.logos.values_mut().for_each(join);
        self.film_logos.values_mut().for_each(join);
        self
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(StudioConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(file: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !file.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(file)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<StudioConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: StudioConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `filmframe.toml` from the given file path (or stock defaults when it
/// is absent), with relative paths resolved against the file's directory.
pub fn load_config(file: &Path) -> Result<StudioConfig, ConfigError> {
    let overlay = load_raw_config(file)?;
    let config = resolve_config(stock_defaults_value(), overlay)?;
    let base = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok(config.resolve_paths(base))
}

/// Returns a fully-commented stock `filmframe.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# filmframe configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
# Relative paths are resolved against the directory of this file.

# ---------------------------------------------------------------------------
# Canvas
# ---------------------------------------------------------------------------
[render]
# Width (px) the photo is scaled to; borders, margins, caption area and
# font size are all derived from it.
target_size = 2400

# Thin black border around the photo.
border = true

# Pad the finished canvas with white to a square.
square = false

# basic1: caption strip under the photo
# basic2: everything centered in one column
# basic3: caption panel to the left of the photo
# format_none: no frame at all
layout = "basic3"

# JPEG quality (1 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# Filters
# ---------------------------------------------------------------------------
[filters]
# Directory holding Titanium_Cinematic_01.cube .. _15.cube for lut01..lut15.
lut_dir = "cubes"

# Default strength when none is given (0 = off, 0.5 = calibrated look,
# 1 = twice the look's deviation from neutral).
strength = 0.5

# Fixed seed for film grain; omit for fresh grain on every render.
# grain_seed = 7

# ---------------------------------------------------------------------------
# Caption font (TrueType / OpenType)
# ---------------------------------------------------------------------------
[fonts]
regular = "fonts/caption.ttf"

# ---------------------------------------------------------------------------
# Logos by camera make, used when captions come from EXIF
# ---------------------------------------------------------------------------
[logos]
# FUJIFILM = "logos/fujifilm.png"
# Canon = "logos/canon.png"

# ---------------------------------------------------------------------------
# Film stock logos, selectable with --film-logo NAME
# ---------------------------------------------------------------------------
[film_logos]
# "Kodak Gold 200" = "films/kodak-gold-200.jpg"
"##
}
