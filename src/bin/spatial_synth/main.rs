//! spatial-synth - terminal keyboard for the spatial synthesizer
//!
//! Run with: cargo run -- [--patch my.toml] [--percussive] [--log synth.log]

mod app;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};

use app::SpatialSynth;

#[derive(Parser, Debug)]
#[command(name = "spatial-synth", about = "Polyphonic synthesizer with binaural placement")]
pub struct Args {
    /// TOML patch with the initial parameter snapshot
    #[arg(long)]
    pub patch: Option<PathBuf>,

    /// Use the exponential attack/decay envelope instead of ADSR
    #[arg(long)]
    pub percussive: bool,

    /// Ring modulator frequency in Hz (1-4000)
    #[arg(long, value_name = "HZ")]
    pub ring_mod: Option<f32>,

    /// Seed for the noise oscillators
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Some(path) = &args.log {
        let file = File::create(path)
            .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    SpatialSynth::from_args(&args)?.run()
}
