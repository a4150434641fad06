use std::path::PathBuf;

use clap::Parser;
use log::info;

use neural_backdrop::{Backdrop, BackdropConfig, BackdropError};

/// Animated neural-network backdrop.
#[derive(Parser, Debug)]
#[command(name = "neural-backdrop")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON config file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible layout
    #[arg(short, long)]
    seed: Option<u64>,

    /// Width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Render offscreen and write a PNG here instead of opening a window
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Frames to simulate before taking the snapshot
    #[arg(long, default_value_t = 120)]
    frames: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), BackdropError> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = match &args.config {
        Some(path) => {
            info!("loading config from {}", path.display());
            BackdropConfig::load(path)?
        }
        None => BackdropConfig::default(),
    };

    let mut backdrop = Backdrop::new().with_config(config);
    if let Some(seed) = args.seed {
        backdrop = backdrop.with_seed(seed);
    }
    if args.width.is_some() || args.height.is_some() {
        let window = &backdrop.config().window;
        let width = args.width.unwrap_or(window.width);
        let height = args.height.unwrap_or(window.height);
        backdrop = backdrop.with_size(width, height);
    }

    match args.snapshot {
        Some(path) => backdrop.snapshot(path, args.frames),
        None => backdrop.run(),
    }
}
