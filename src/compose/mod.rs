//! Framing: caption, logos, swatch and border around a graded photo.
//!
//! | Key | Layout |
//! |---|---|
//! | `basic1` | [`strip`]: info strip under the photo, portrait photos framed sideways |
//! | `basic2` | [`stack`]: everything centered in one column |
//! | `basic3` | [`panel`]: info panel beside the photo (default) |
//! | `format_none` | the photo as-is |
//!
//! Each layout is a pure function from sizes and measured text to a
//! [`LayoutPlan`]; [`plan::paint`] renders any plan. Square mode pads the
//! finished canvas with white on its short axis.
//!
//! ## Captions
//!
//! With caption text, the first blank line separates the camera line from
//! the lens line. Without it, the caption and the camera logo come from
//! the photo's EXIF block. When that block is missing or unusable, `basic1`
//! returns the photo untouched and the other layouts frame it with an
//! empty caption.

pub mod caption;
pub mod panel;
pub mod plan;
pub mod stack;
pub mod strip;
mod style;

pub use caption::CaptionBlock;
pub use plan::LayoutPlan;
pub use style::StyleConstants;

use crate::config::{ConfigError, StudioConfig};
use crate::imaging::operations::{WHITE, pad_to_square};
use crate::imaging::{ImageBackend, PaletteExtractor, TextRenderer};
use crate::metadata::read_camera_metadata;
use image::{DynamicImage, RgbImage};
use panel::PanelLogos;
use plan::PaintContext;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayoutKey {
    /// `basic1`
    Strip,
    /// `basic2`
    Stack,
    /// `basic3`
    #[default]
    Panel,
    /// `format_none`
    Passthrough,
}

impl LayoutKey {
    pub const ALL: [LayoutKey; 4] = [
        LayoutKey::Strip,
        LayoutKey::Stack,
        LayoutKey::Panel,
        LayoutKey::Passthrough,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutKey::Strip => "basic1",
            LayoutKey::Stack => "basic2",
            LayoutKey::Panel => "basic3",
            LayoutKey::Passthrough => "format_none",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LayoutKey::Strip => "info strip below the photo",
            LayoutKey::Stack => "logo, photo, swatch and caption centered in a column",
            LayoutKey::Panel => "info panel to the left of the photo",
            LayoutKey::Passthrough => "no frame",
        }
    }
}

impl FromStr for LayoutKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LayoutKey::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownLayout(s.to_string()))
    }
}

impl fmt::Display for LayoutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-call framing options.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    pub layout: LayoutKey,
    /// Width the photo is scaled to inside the frame.
    pub target_size: u32,
    pub border: bool,
    pub square: bool,
    /// Extra caption line (film stock, exposure notes).
    pub supplementary: Option<String>,
    /// A `[film_logos]` name or a path to a film-stock logo.
    pub film_logo: Option<String>,
}

impl ComposeOptions {
    pub fn from_config(config: &StudioConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            layout: config.layout()?,
            target_size: config.render.target_size,
            border: config.render.border,
            square: config.render.square,
            supplementary: None,
            film_logo: None,
        })
    }
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            layout: LayoutKey::default(),
            target_size: 2400,
            border: true,
            square: false,
            supplementary: None,
            film_logo: None,
        }
    }
}

/// The photo being framed and what the caller said about it.
#[derive(Debug, Clone, Copy)]
pub struct ComposeRequest<'a> {
    pub image: &'a RgbImage,
    /// Raw EXIF block, used when `caption` is empty.
    pub exif: Option<&'a [u8]>,
    pub caption: &'a str,
    pub logo: Option<&'a Path>,
}

/// Frames photos. Borrows its collaborators so one set of fonts and
/// backends serves any number of calls.
pub struct Compositor<'a> {
    backend: &'a dyn ImageBackend,
    text: &'a dyn TextRenderer,
    palette: &'a dyn PaletteExtractor,
    config: &'a StudioConfig,
}

impl<'a> Compositor<'a> {
    pub fn new(
        backend: &'a dyn ImageBackend,
        text: &'a dyn TextRenderer,
        palette: &'a dyn PaletteExtractor,
        config: &'a StudioConfig,
    ) -> Self {
        Self {
            backend,
            text,
            palette,
            config,
        }
    }

    pub fn compose(
        &self,
        request: &ComposeRequest<'_>,
        options: &ComposeOptions,
    ) -> Result<RgbImage, ComposeError> {
        let (w, h) = request.image.dimensions();
        if w == 0 || h == 0 {
            return Err(ComposeError::InvalidInput("photo has no pixels".into()));
        }
        if options.target_size == 0 {
            return Err(ComposeError::InvalidInput(
                "target size must be positive".into(),
            ));
        }
        if options.layout == LayoutKey::Passthrough {
            return Ok(request.image.clone());
        }

        let supplementary = options.supplementary.as_deref();
        let mut logo_path = request.logo.map(Path::to_path_buf);
        let caption = if request.caption.is_empty() {
            match read_camera_metadata(request.exif) {
                Ok(meta) => {
                    if let Some(path) = self.config.logo_for_make(&meta.make) {
                        logo_path = Some(PathBuf::from(path));
                    } else {
                        debug!(make = %meta.make, "no logo configured for camera make");
                    }
                    CaptionBlock::from_metadata(&meta, supplementary)
                }
                Err(e) if options.layout == LayoutKey::Strip => {
                    info!(error = %e, "no camera metadata for caption, returning photo unframed");
                    return Ok(request.image.clone());
                }
                Err(e) => {
                    info!(error = %e, "no camera metadata for caption, framing without one");
                    CaptionBlock::parse("", supplementary)
                }
            }
        } else {
            CaptionBlock::parse(request.caption, supplementary)
        };

        let logo = logo_path.as_deref().and_then(|p| self.load_logo(p));
        let film_logo = options
            .film_logo
            .as_deref()
            .and_then(|r| self.load_logo(&self.config.film_logo(r)));

        let style = StyleConstants::new(options.target_size, options.border);
        let dims = |img: &DynamicImage| (img.width(), img.height());
        let plan = match options.layout {
            LayoutKey::Strip => strip::plan((w, h), logo.as_ref().map(dims), &caption, &style),
            LayoutKey::Stack => {
                stack::plan((w, h), logo.as_ref().map(dims), &caption, &style, self.text)
            }
            LayoutKey::Panel => panel::plan(
                (w, h),
                PanelLogos {
                    primary: logo.as_ref().map(dims),
                    film: film_logo.as_ref().map(dims),
                },
                &caption,
                &style,
                self.text,
            ),
            LayoutKey::Passthrough => return Ok(request.image.clone()),
        };
        debug!(
            layout = %options.layout,
            width = plan.canvas.0,
            height = plan.canvas.1,
            quarter_turn = plan.quarter_turn,
            "planned frame"
        );

        let framed = plan::paint(
            &plan,
            &PaintContext {
                image: request.image,
                logo: logo.as_ref(),
                film_logo: film_logo.as_ref(),
                style: &style,
                text: self.text,
                palette: self.palette,
            },
        );

        Ok(if options.square {
            pad_to_square(&framed, WHITE)
        } else {
            framed
        })
    }

    fn load_logo(&self, path: &Path) -> Option<DynamicImage> {
        match self.backend.load_logo(path) {
            Ok(logo) if logo.width() > 0 && logo.height() > 0 => Some(logo),
            Ok(_) => {
                warn!(path = %path.display(), "logo is empty, skipping");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "logo unavailable, skipping");
                None
            }
        }
    }
}
