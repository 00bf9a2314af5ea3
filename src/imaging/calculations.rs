//! Pure calculation functions for layout geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Integer results truncate toward zero, the same way every layout floors
//! its fractional offsets.

/// Landscape aspect tolerance for the bottom-strip layout: images narrower
/// than this fraction of their height are turned a quarter before framing.
const PORTRAIT_RATIO: f64 = 0.95;

/// Scale `source` to an exact width, preserving aspect ratio.
///
/// # Examples
/// ```
/// # use filmframe::imaging::calculations::fit_width;
/// assert_eq!(fit_width((4000, 3000), 2400), (2400, 1800));
/// ```
pub fn fit_width(source: (u32, u32), width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let height = (src_h as u64 * width as u64 / src_w.max(1) as u64) as u32;
    (width, height.max(1))
}

/// Scale `source` to a (possibly fractional) target height, preserving
/// aspect ratio. Used for logos, whose height is a fraction of the info area.
pub fn fit_height(source: (u32, u32), height: f64) -> (u32, u32) {
    let (src_w, src_h) = source;
    let width = src_w as f64 * height / src_h.max(1) as f64;
    ((width as u32).max(1), (height as u32).max(1))
}

/// Whether the bottom-strip layout should frame this image turned sideways.
pub fn needs_quarter_turn(width: u32, height: u32) -> bool {
    (width as f64) < height as f64 * PORTRAIT_RATIO
}

/// Where a `width`×`height` canvas lands on its square pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquarePlacement {
    pub side: u32,
    pub x: u32,
    pub y: u32,
}

/// Compute the square side and the centered offset of the original canvas.
///
/// # Examples
/// ```
/// # use filmframe::imaging::calculations::{square_placement, SquarePlacement};
/// assert_eq!(
///     square_placement(300, 100),
///     SquarePlacement { side: 300, x: 0, y: 100 }
/// );
/// ```
pub fn square_placement(width: u32, height: u32) -> SquarePlacement {
    let side = width.max(height);
    SquarePlacement {
        side,
        x: (side - width) / 2,
        y: (side - height) / 2,
    }
}

/// How a swatch bar divides its width among colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwatchFill {
    /// Blocks are one pixel wider than an even split so the last block
    /// reaches the right edge (overflow is clipped).
    Overlap,
    /// Even split, never narrower than one pixel; a remainder stays unfilled.
    Even,
}

/// Width of each color block in a swatch bar.
pub fn swatch_block_width(total_width: u32, count: usize, fill: SwatchFill) -> u32 {
    let count = count.max(1) as u32;
    match fill {
        SwatchFill::Overlap => total_width / count + 1,
        SwatchFill::Even => (total_width / count).max(1),
    }
}

/// Greedy word wrap against a pixel budget.
///
/// Words are added to the current line while the measured line fits in
/// `max_width`; a word that does not fit starts a new line. A single word
/// wider than the budget still gets its own line.
pub fn wrap_words(text: &str, max_width: u32, measure: impl Fn(&str) -> u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        let mut candidate = current.clone();
        candidate.push(word);
        if measure(&candidate.join(" ")) <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(current.join(" "));
            }
            current = vec![word];
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    lines
}
