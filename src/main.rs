use clap::{Parser, Subcommand};
use filmframe::compose::{ComposeOptions, Compositor, LayoutKey};
use filmframe::config::{self, CONFIG_FILE, StudioConfig};
use filmframe::filters::FilterEngine;
use filmframe::imaging::rust_backend::supported_input_extensions;
use filmframe::imaging::{FontRenderer, KMeansPalette, Quality, RustBackend};
use filmframe::output;
use filmframe::render::{RenderJob, render_photo};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filmframe")]
#[command(about = "Film looks, cube LUTs and captioned frames for photographs")]
#[command(long_about = "\
Film looks, cube LUTs and captioned frames for photographs

A render grades the photo with a filter, then frames it with a layout:

  filmframe render dawn.jpg -o dawn-framed.jpg --filter film_kodak_g200

Captions are two lines separated by a blank line (camera, then lens). Leave
--caption out to read them from the photo's EXIF data; the camera make then
also picks the logo from the [logos] table.

Run 'filmframe gen-config' to generate a documented filmframe.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./filmframe.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Photo to render
    input: PathBuf,

    /// Output file (.jpg or .png)
    #[arg(short, long)]
    output: PathBuf,

    /// Filter key (see `filmframe filters`)
    #[arg(long, default_value = "none")]
    filter: String,

    /// Filter strength, 0 to 1 (default from config)
    #[arg(long)]
    strength: Option<f32>,

    /// Layout key (see `filmframe layouts`)
    #[arg(long)]
    layout: Option<String>,

    /// Caption: "Camera\n\nLens". Omit to read EXIF
    #[arg(long, default_value = "")]
    caption: String,

    /// Logo image for the caption
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Film stock logo: a [film_logos] name or a path
    #[arg(long)]
    film_logo: Option<String>,

    /// Extra caption line
    #[arg(long)]
    supplementary: Option<String>,

    /// Width the photo is scaled to inside the frame
    #[arg(long)]
    size: Option<u32>,

    /// Leave out the black border around the photo
    #[arg(long)]
    no_border: bool,

    /// Pad the result to a square
    #[arg(long)]
    square: bool,

    /// Seed for film grain, for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Grade and frame one photo
    Render(RenderArgs),
    /// List filter keys
    Filters,
    /// List layout keys
    Layouts,
    /// Print a stock filmframe.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render(args) => {
            let config = load(cli.config.as_deref())?;
            render(&args, &config)?;
        }
        Command::Filters => {
            let config = load(cli.config.as_deref())?;
            output::print_filters(&FilterEngine::from_config(&config.filters));
        }
        Command::Layouts => {
            let config = load(cli.config.as_deref())?;
            output::print_layouts(config.layout()?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load(file: Option<&Path>) -> Result<StudioConfig, config::ConfigError> {
    config::load_config(file.unwrap_or(Path::new(CONFIG_FILE)))
}

fn render(args: &RenderArgs, config: &StudioConfig) -> Result<(), Box<dyn std::error::Error>> {
    let supported = supported_input_extensions();
    let ext = args
        .input
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !supported.contains(&ext.as_str()) {
        return Err(format!(
            "{}: unsupported photo format (expected one of: {})",
            args.input.display(),
            supported.join(", ")
        )
        .into());
    }

    let mut options = ComposeOptions::from_config(config)?;
    if let Some(layout) = &args.layout {
        options.layout = layout.parse::<LayoutKey>()?;
    }
    if let Some(size) = args.size {
        options.target_size = size;
    }
    options.border &= !args.no_border;
    options.square |= args.square;
    options.supplementary = args.supplementary.clone();
    options.film_logo = args.film_logo.clone();

    let backend = RustBackend::new();
    let font = FontRenderer::from_file(Path::new(&config.fonts.regular))?;
    let palette = KMeansPalette::default();
    let compositor = Compositor::new(&backend, &font, &palette, config);
    let engine =
        FilterEngine::from_config(&config.filters).with_seed(args.seed.or(config.filters.grain_seed));

    let job = RenderJob {
        input: args.input.clone(),
        output: args.output.clone(),
        filter: args.filter.clone(),
        strength: args.strength.unwrap_or(config.filters.strength),
        caption: args.caption.replace("\\n", "\n"),
        logo: args.logo.clone(),
        options,
        quality: Quality::new(args.quality.unwrap_or(config.render.quality)),
    };
    let report = render_photo(&job, &backend, &engine, &compositor)?;
    output::print_render_report(&report);
    Ok(())
}
