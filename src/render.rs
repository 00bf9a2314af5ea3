//! One photo through the whole pipeline.
//!
//! ```text
//! decode ──► grade (filter / LUT) ──► frame (layout) ──► encode
//! ```
//!
//! Decoding and encoding go through an [`ImageBackend`], so tests can run
//! the pipeline against the in-memory mock. A filter can never fail a
//! render (see [`FilterEngine`]); a missing input, an unwritable output or a
//! degenerate frame request can.

use crate::compose::{ComposeError, ComposeOptions, ComposeRequest, Compositor, LayoutKey};
use crate::filters::{FilterEngine, FilterKey};
use crate::imaging::{BackendError, ImageBackend, Quality, SaveParams};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Framing failed: {0}")]
    Compose(#[from] ComposeError),
}

/// What to render and how.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Filter key; unknown keys grade nothing.
    pub filter: String,
    pub strength: f32,
    /// Caption text; empty means "read it from EXIF".
    pub caption: String,
    pub logo: Option<PathBuf>,
    pub options: ComposeOptions,
    pub quality: Quality,
}

/// Summary of a finished render, for CLI output.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub filter: FilterKey,
    pub strength: f32,
    pub layout: LayoutKey,
    pub source_size: (u32, u32),
    pub output_size: (u32, u32),
    pub elapsed: Duration,
}

pub fn render_photo(
    job: &RenderJob,
    backend: &dyn ImageBackend,
    engine: &FilterEngine,
    compositor: &Compositor<'_>,
) -> Result<RenderReport, RenderError> {
    let started = Instant::now();
    let photo = backend.decode(&job.input)?;
    let filter = FilterKey::resolve(&job.filter);

    let graded = engine.apply_key(&photo.image.to_rgb8(), filter, job.strength);
    let framed = compositor.compose(
        &ComposeRequest {
            image: &graded,
            exif: photo.exif.as_deref(),
            caption: &job.caption,
            logo: job.logo.as_deref(),
        },
        &job.options,
    )?;

    if let Some(parent) = job.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    backend.save(
        &framed,
        &SaveParams {
            output: job.output.clone(),
            quality: job.quality,
        },
    )?;

    let report = RenderReport {
        input: job.input.clone(),
        output: job.output.clone(),
        filter,
        strength: job.strength,
        layout: job.options.layout,
        source_size: photo.dimensions(),
        output_size: framed.dimensions(),
        elapsed: started.elapsed(),
    };
    info!(
        input = %report.input.display(),
        filter = %report.filter,
        layout = %report.layout,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "rendered"
    );
    Ok(report)
}
