use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hero_cube::{run_app, DeviceTier, HeroConfig};

/// Opens a window with the hero cube spinning in it.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON configuration file; every field is optional.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logo to put on the faces: a file path or an http(s) URL.
    #[arg(long)]
    logo: Option<String>,

    /// Skip device classification and use this tier.
    #[arg(long)]
    tier: Option<DeviceTier>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => HeroConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => HeroConfig::default(),
    };
    if let Some(logo) = args.logo {
        config.logo = Some(logo);
    }
    if let Some(tier) = args.tier {
        config.tier = Some(tier);
    }

    run_app(config)
}
