//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! dawn.jpg → dawn-framed.jpg
//!     Filter: film_kodak_g200 @ 0.50
//!     Layout: basic3
//!     Size: 6000x4000 → 2680x1854
//!     Took: 812 ms
//! ```
//!
//! ## Filters / Layouts
//!
//! ```text
//! black_white      black & white with extra contrast
//! basic3 (default) info panel to the left of the photo
//! ```

use crate::compose::LayoutKey;
use crate::filters::{FilterEngine, FilterKey};
use crate::render::RenderReport;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Two columns, the first padded to the widest key.
fn columns(rows: &[(String, String)]) -> Vec<String> {
    let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    rows.iter()
        .map(|(k, v)| format!("{k:<width$}  {v}"))
        .collect()
}

pub fn format_render_report(report: &RenderReport) -> Vec<String> {
    let filter = match report.filter {
        FilterKey::None => "none".to_string(),
        key => format!("{key} @ {:.2}", report.strength),
    };
    vec![
        format!(
            "{} → {}",
            file_name(&report.input),
            file_name(&report.output)
        ),
        format!("{}Filter: {filter}", indent(1)),
        format!("{}Layout: {}", indent(1), report.layout),
        format!(
            "{}Size: {}x{} → {}x{}",
            indent(1),
            report.source_size.0,
            report.source_size.1,
            report.output_size.0,
            report.output_size.1
        ),
        format!("{}Took: {} ms", indent(1), report.elapsed.as_millis()),
    ]
}

/// Every filter key with a one-line description. LUT slots whose cube file
/// is missing from the engine's directory are marked.
pub fn format_filters(engine: &FilterEngine) -> Vec<String> {
    let rows: Vec<(String, String)> = FilterKey::all()
        .into_iter()
        .map(|key| {
            let mut description = key.description().to_string();
            if let FilterKey::Lut(slot) = key {
                let path = engine.lut_path(slot);
                description = if path.exists() {
                    format!("{description} ({})", file_name(&path))
                } else {
                    format!("{description} (missing: {})", path.display())
                };
            }
            (key.to_string(), description)
        })
        .collect();
    columns(&rows)
}

pub fn format_layouts(default: LayoutKey) -> Vec<String> {
    let rows: Vec<(String, String)> = LayoutKey::ALL
        .into_iter()
        .map(|key| {
            let name = if key == default {
                format!("{key} (default)")
            } else {
                key.to_string()
            };
            (name, key.description().to_string())
        })
        .collect();
    columns(&rows)
}

pub fn print_render_report(report: &RenderReport) {
    for line in format_render_report(report) {
        println!("{}", line);
    }
}

pub fn print_filters(engine: &FilterEngine) {
    for line in format_filters(engine) {
        println!("{}", line);
    }
}

pub fn print_layouts(default: LayoutKey) {
    for line in format_layouts(default) {
        println!("{}", line);
    }
}
