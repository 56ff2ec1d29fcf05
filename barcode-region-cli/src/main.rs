use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use barcode_region::{Detector, DetectorConfig, GrayView, Region};

/// Barcode region CLI: locate 1-D barcodes in PNG/JPEG/WebP images
#[derive(Parser)]
#[command(name = "barcode-regions", version)]
struct Args {
    /// Input image files (PNG, JPEG or WebP)
    #[arg(required = true)]
    images: Vec<String>,

    /// TOML file with detector settings; flags below override it
    #[arg(short, long)]
    config: Option<String>,

    /// Block size in pixels
    #[arg(short, long)]
    block_size: Option<u32>,

    /// Gradient threshold for a candidate block
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Binarize samples at this level before scoring
    #[arg(long)]
    binarize: Option<u8>,

    /// Weight of the vertical difference penalty
    #[arg(long)]
    vertical_weight: Option<f32>,

    /// Margin in pixels for merging nearby boxes
    #[arg(long)]
    merge_margin: Option<u32>,

    /// Minimum region width in pixels
    #[arg(long)]
    min_width: Option<u32>,

    /// Minimum region height in pixels
    #[arg(long)]
    min_height: Option<u32>,

    /// Minimum width/height ratio
    #[arg(long)]
    min_aspect: Option<f32>,

    /// Maximum width/height ratio
    #[arg(long)]
    max_aspect: Option<f32>,

    /// Minimum fraction of candidate blocks in a region
    #[arg(long)]
    min_density: Option<f32>,

    /// Minimum run of consecutive candidate blocks in a region
    #[arg(long)]
    min_run: Option<u32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Serialize)]
struct OutputResult<'a> {
    file: &'a str,
    image_width: u32,
    image_height: u32,
    regions: Vec<Region>,
}

fn load_config(args: &Args) -> Result<DetectorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {path}"))?;
            DetectorConfig::from_toml(&text)
                .with_context(|| format!("invalid config file: {path}"))?
        }
        None => DetectorConfig::default(),
    };

    if let Some(v) = args.block_size {
        config.block_size = v;
    }
    if let Some(v) = args.threshold {
        config.gradient_threshold = v;
    }
    if args.binarize.is_some() {
        config.binarize_level = args.binarize;
    }
    if let Some(v) = args.vertical_weight {
        config.vertical_weight = v;
    }
    if let Some(v) = args.merge_margin {
        config.merge_margin = v;
    }
    if let Some(v) = args.min_width {
        config.min_width = v;
    }
    if let Some(v) = args.min_height {
        config.min_height = v;
    }
    if let Some(v) = args.min_aspect {
        config.min_aspect = v;
    }
    if let Some(v) = args.max_aspect {
        config.max_aspect = v;
    }
    if let Some(v) = args.min_density {
        config.min_density = v;
    }
    if let Some(v) = args.min_run {
        config.min_run_blocks = v;
    }
    Ok(config)
}

fn load_image(path: &str) -> Result<(u32, u32, Vec<u8>)> {
    let img = image::open(Path::new(path))
        .with_context(|| format!("failed to open image: {path}"))?
        .into_luma8();
    let (width, height) = img.dimensions();
    Ok((width, height, img.into_raw()))
}

fn process(detector: &Detector, path: &str, pretty: bool) -> Result<()> {
    let (width, height, pixels) = load_image(path)?;
    let view = GrayView::new(width, height, &pixels)
        .with_context(|| format!("unusable image: {path}"))?;

    info!("detecting in {path} ({width}x{height})");
    let now = std::time::Instant::now();
    let regions = detector.detect(&view);
    info!("  found {} regions in {:.2?}", regions.len(), now.elapsed());

    let result = OutputResult {
        file: path,
        image_width: width,
        image_height: height,
        regions,
    };
    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args)?;
    let detector = Detector::new(config).context("invalid detector configuration")?;

    // A failing image is reported and skipped; the rest of the batch still runs.
    let mut failed = 0usize;
    for path in &args.images {
        if let Err(e) = process(&detector, path, args.pretty) {
            error!("{e:#}");
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} images failed", args.images.len());
    }
    Ok(())
}
