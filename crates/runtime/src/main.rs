//! # Ball Drop
//!
//! Opens a window showing a sphere dropping onto a tilted box, with the
//! physics wireframe overlaid. `--headless` runs the same frame loop without
//! a window.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use runtime::{app, SceneConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ball_drop", version, about = "Rigid-body ball drop with a physics debug overlay")]
struct Cli {
    /// Run without a window against the CPU scene graph
    #[arg(long)]
    headless: bool,

    /// Number of frames to run in headless mode
    #[arg(long, default_value_t = 1200)]
    frames: u64,

    /// TOML scene configuration; built-in defaults when omitted
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    if cli.headless {
        app::run_headless(&config, cli.frames)?;
        Ok(())
    } else {
        app::run_windowed(&config)
    }
}
