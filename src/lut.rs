//! 3D color lookup tables in the `.cube` text format.
//!
//! # Format
//!
//! ```text
//! # Comment
//! TITLE "Titanium Cinematic 01"
//! LUT_3D_SIZE 33
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//! 0.000000 0.000000 0.000000
//! ...
//! 1.000000 1.000000 1.000000
//! ```
//!
//! Keywords are matched case-insensitively. Red varies fastest in the data
//! rows, so row `r + g·N + b·N²` holds the
//! output for grid point `(r, g, b)`. The table is stored in file order and
//! addressed that way; swapping the axes would still produce a believable
//! but wrong grade.
//!
//! Parsed tables are immutable. [`LutCache`] keeps one `Arc<CubeLut>` per
//! canonical path for the life of the process.

use image::Rgb32FImage;
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Keeps the upper-edge coordinate strictly inside the last grid cell.
const EDGE_EPSILON: f32 = 1e-6;

/// Floor for a channel's domain width; a flat domain maps everything at or
/// above its minimum to the top of the grid.
const MIN_DOMAIN_SPAN: f32 = 1e-12;

#[derive(Debug, Error)]
pub enum LutError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CubeLut {
    pub size: usize,
    /// `size³` output colors in file order (red fastest).
    pub table: Vec<[f32; 3]>,
    pub domain_min: [f32; 3],
    pub domain_max: [f32; 3],
}

fn parse_size(line: &str) -> Result<usize, LutError> {
    let value = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| LutError::Parse("LUT_3D_SIZE without a value".into()))?;
    let size: usize = value
        .parse()
        .map_err(|_| LutError::Parse(format!("invalid LUT_3D_SIZE '{value}'")))?;
    if size < 2 {
        return Err(LutError::Parse(format!(
            "LUT_3D_SIZE must be at least 2, got {size}"
        )));
    }
    Ok(size)
}

fn parse_triplet(tokens: &[&str]) -> Option<[f32; 3]> {
    if tokens.len() < 3 {
        return None;
    }
    Some([
        tokens[0].parse().ok()?,
        tokens[1].parse().ok()?,
        tokens[2].parse().ok()?,
    ])
}

fn parse_domain(line: &str) -> Result<[f32; 3], LutError> {
    let tokens: Vec<&str> = line.split_whitespace().skip(1).collect();
    parse_triplet(&tokens).ok_or_else(|| LutError::Parse(format!("invalid domain line '{line}'")))
}

/// Parse a cube table from any buffered reader.
pub fn parse_cube<R: BufRead>(reader: R) -> Result<CubeLut, LutError> {
    let mut size: Option<usize> = None;
    let mut domain_min = [0.0_f32; 3];
    let mut domain_max = [1.0_f32; 3];
    let mut table: Vec<[f32; 3]> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let keyword = line.split_whitespace().next().unwrap_or_default();
        if keyword.eq_ignore_ascii_case("LUT_3D_SIZE") {
            let n = parse_size(line)?;
            table.reserve(n * n * n);
            size = Some(n);
        } else if keyword.eq_ignore_ascii_case("DOMAIN_MIN") {
            domain_min = parse_domain(line)?;
        } else if keyword.eq_ignore_ascii_case("DOMAIN_MAX") {
            domain_max = parse_domain(line)?;
        } else if line.starts_with(|c: char| c.is_ascii_alphabetic()) {
            // TITLE, LUT_3D_INPUT_RANGE and vendor keywords
            continue;
        } else {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match parse_triplet(&tokens) {
                Some(rgb) => table.push(rgb),
                None => debug!(line, "skipping unparseable cube row"),
            }
        }
    }

    let size = size.ok_or_else(|| LutError::Parse("missing LUT_3D_SIZE".into()))?;
    let expected = size * size * size;
    if table.len() < expected {
        return Err(LutError::Parse(format!(
            "expected {} rows, found {}",
            expected,
            table.len()
        )));
    }
    table.truncate(expected);

    Ok(CubeLut {
        size,
        table,
        domain_min,
        domain_max,
    })
}

/// Read and parse a `.cube` file.
pub fn load_cube(path: &Path) -> Result<CubeLut, LutError> {
    let file = std::fs::File::open(path)?;
    parse_cube(BufReader::new(file))
}

impl CubeLut {
    #[inline]
    fn node(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.table[r + g * self.size + b * self.size * self.size]
    }

    /// Continuous grid coordinate for one channel: lower index and fraction.
    #[inline]
    fn locate(&self, value: f32, channel: usize) -> (usize, f32) {
        let span = (self.domain_max[channel] - self.domain_min[channel]).max(MIN_DOMAIN_SPAN);
        let unit = ((value - self.domain_min[channel]) / span).clamp(0.0, 1.0 - EDGE_EPSILON);
        let scaled = unit * (self.size - 1) as f32;
        let lower = (scaled.floor() as usize).min(self.size - 2);
        (lower, scaled - lower as f32)
    }

    /// Trilinear lookup of a single color.
    pub fn sample(&self, rgb: [f32; 3]) -> [f32; 3] {
        let (r0, fr) = self.locate(rgb[0], 0);
        let (g0, fg) = self.locate(rgb[1], 1);
        let (b0, fb) = self.locate(rgb[2], 2);

        let c000 = self.node(r0, g0, b0);
        let c100 = self.node(r0 + 1, g0, b0);
        let c010 = self.node(r0, g0 + 1, b0);
        let c110 = self.node(r0 + 1, g0 + 1, b0);
        let c001 = self.node(r0, g0, b0 + 1);
        let c101 = self.node(r0 + 1, g0, b0 + 1);
        let c011 = self.node(r0, g0 + 1, b0 + 1);
        let c111 = self.node(r0 + 1, g0 + 1, b0 + 1);

        let mut out = [0.0f32; 3];
        for c in 0..3 {
            let c00 = c000[c] + (c100[c] - c000[c]) * fr;
            let c10 = c010[c] + (c110[c] - c010[c]) * fr;
            let c01 = c001[c] + (c101[c] - c001[c]) * fr;
            let c11 = c011[c] + (c111[c] - c011[c]) * fr;
            let c0 = c00 + (c10 - c00) * fg;
            let c1 = c01 + (c11 - c01) * fg;
            out[c] = c0 + (c1 - c0) * fb;
        }
        out
    }
}

/// Remap every pixel through `lut`, blended with the input by `strength`.
///
/// Strength 0 returns the input untouched and strength 1 (or more) the pure
/// remap.
pub fn apply_lut(image: &Rgb32FImage, lut: &CubeLut, strength: f32) -> Rgb32FImage {
    let s = strength.clamp(0.0, 1.0);
    if s <= 0.0 {
        return image.clone();
    }

    let mut out = image.clone();
    for px in out.pixels_mut() {
        let mapped = lut.sample(px.0);
        if s >= 1.0 {
            px.0 = mapped;
        } else {
            for c in 0..3 {
                px.0[c] = px.0[c] * (1.0 - s) + mapped[c] * s;
            }
        }
    }
    out
}

/// Process-wide store of parsed tables keyed by canonical path.
#[derive(Debug, Default)]
pub struct LutCache {
    entries: Mutex<HashMap<PathBuf, Arc<CubeLut>>>,
}

impl LutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, parsing it on first use.
    ///
    /// The lock is not held while parsing; if two callers race on the same
    /// file, the first insert wins and both get the same table.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<CubeLut>, LutError> {
        let key = path.canonicalize()?;
        if let Some(lut) = self.lock().get(&key) {
            return Ok(Arc::clone(lut));
        }

        let started = Instant::now();
        let lut = Arc::new(load_cube(&key)?);
        info!(
            path = %key.display(),
            size = lut.size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "loaded cube LUT"
        );

        Ok(Arc::clone(self.lock().entry(key).or_insert(lut)))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Arc<CubeLut>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
