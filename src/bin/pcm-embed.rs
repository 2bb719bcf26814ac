//! Convert a directory tree of WAV recordings into firmware-ready sample arrays
//!
//! Usage:
//!   pcm-embed [OPTIONS] [ROOT]
//!
//! Writes `<stem>-edited.wav` next to every input and `sound.h` / `sound.c`
//! into the output directory, then prints a size summary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use pcm_embed::preprocessing::resample::DecimationPolicy;
use pcm_embed::{run_batch, BitDepth, FailurePolicy, PipelineConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DecimationArg {
    /// step = round(in / out)
    Nearest,
    /// step = round(in / out) - 1
    NearestMinusOne,
}

impl From<DecimationArg> for DecimationPolicy {
    fn from(arg: DecimationArg) -> Self {
        match arg {
            DecimationArg::Nearest => DecimationPolicy::Nearest,
            DecimationArg::NearestMinusOne => DecimationPolicy::NearestMinusOne,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Condition WAV recordings and export them as C sample arrays")]
struct Args {
    /// Root directory searched recursively for inputs
    #[arg(default_value = "sound")]
    root: PathBuf,

    /// JSON configuration file (command-line flags override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the header/source files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Base name of the header/source files
    #[arg(short, long)]
    name: Option<String>,

    /// Output sample rate in Hz
    #[arg(short, long)]
    rate: Option<f64>,

    /// Butterworth filter order
    #[arg(long)]
    order: Option<usize>,

    /// Output bit depth (8, 12 or 16)
    #[arg(short, long)]
    bits: Option<u32>,

    /// Silence threshold (linear amplitude)
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Decimation step formula
    #[arg(long, value_enum)]
    decimation: Option<DecimationArg>,

    /// Skip files that fail instead of aborting the batch
    #[arg(short, long)]
    keep_going: bool,

    /// Parallel workers (default: CPU-1)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Do not write the per-file WAV files
    #[arg(long)]
    no_wav: bool,

    /// Also write raw little-endian binaries next to the inputs
    #[arg(long)]
    raw: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<(PipelineConfig, PathBuf, bool)> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(name) = self.name {
            config.artifact_name = name;
        }
        if let Some(rate) = self.rate {
            config.target_rate_hz = rate;
        }
        if let Some(order) = self.order {
            config.filter_order = order;
        }
        if let Some(bits) = self.bits {
            config.bit_depth = BitDepth::try_from(bits)?;
        }
        if let Some(threshold) = self.threshold {
            config.silence_threshold = threshold;
        }
        if let Some(decimation) = self.decimation {
            config.decimation = decimation.into();
        }
        if self.keep_going {
            config.failure_policy = FailurePolicy::Skip;
        }
        if self.jobs.is_some() {
            config.jobs = self.jobs;
        }
        if self.no_wav {
            config.write_wav = false;
        }
        if self.raw {
            config.write_raw = true;
        }

        Ok((config, self.root, self.json))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let (config, root, json) = args.into_config()?;
    let report = run_batch(&root, &config)
        .with_context(|| format!("Batch conversion of {} failed", root.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.summary());
    }

    Ok(())
}
