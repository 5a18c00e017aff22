// riverframe - Render the river backdrop to a PNG
//
// Drives the same renderer the browser uses, through headless host doubles
// and a software painter, then flattens the transparent frame onto a page
// colour so the white-on-clear scene is visible.
//
// Usage: cargo run --bin riverframe -- [--width 1440] [--height 900] [--dpr 1]
//        [--frames 120] [--config cfg.json | --site-root] [--reduced-motion]
//        [--background #0b1f33] [--out riverframe.png]

mod color;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use river_engine::host::headless::HeadlessHost;
use river_engine::render::RasterPainter;
use river_engine::{BackgroundConfig, Renderer, Viewport};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "riverframe", about = "Render one frame of the river backdrop to PNG")]
struct Args {
    /// Viewport width in CSS pixels
    #[arg(long, default_value_t = 1440.0)]
    width: f64,

    /// Viewport height in CSS pixels
    #[arg(long, default_value_t = 900.0)]
    height: f64,

    /// Device pixel ratio, capped at 2
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Frames to run before capturing; mounting paints the first one
    #[arg(long, default_value_t = 120)]
    frames: u32,

    #[arg(long, default_value_t = 0x00C0_FFEE)]
    seed: u32,

    /// JSON config with camelCase keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the tuning of the persistent root layout
    #[arg(long, conflicts_with = "config")]
    site_root: bool,

    #[arg(long)]
    reduced_motion: bool,

    /// Page colour behind the canvas
    #[arg(long, default_value = "#0b1f33")]
    background: String,

    #[arg(long, short, default_value = "riverframe.png")]
    out: PathBuf,

    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let background = color::Color::parse_hex(&args.background)?;

    let viewport = Viewport::new(args.width, args.height, args.dpr);
    if viewport.is_empty() {
        bail!("viewport must be non-empty, got {}x{}", args.width, args.height);
    }

    let host = HeadlessHost::headless(viewport);
    host.motion.set(Some(args.reduced_motion));

    let mut renderer = Renderer::new(Some(RasterPainter::new()), host, config, args.seed);
    renderer.mount();
    for _ in 1..args.frames {
        renderer.frame();
    }

    let scene = renderer.scene();
    info!(
        frames = args.frames.max(1),
        time = scene.time(),
        fish = scene.fish.len(),
        river_top = scene.band().top,
        "frame rendered"
    );

    let image = renderer
        .into_surface()
        .context("renderer has no surface")?
        .into_image();
    let flat = color::flatten(&image, background);
    flat.save(&args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;

    println!(
        "Wrote {} ({}x{})",
        args.out.display(),
        flat.width(),
        flat.height()
    );
    Ok(())
}

fn load_config(args: &Args) -> Result<BackgroundConfig> {
    if args.site_root {
        return Ok(BackgroundConfig::site_root());
    }
    let Some(path) = &args.config else {
        return Ok(BackgroundConfig::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    BackgroundConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
