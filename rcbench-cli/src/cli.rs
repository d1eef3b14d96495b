// rcbench-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use rcbench_core::config::ClipSpec;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "rcbench: Encoder relative-complexity benchmark",
    long_about = "Measures the relative computational cost of x264 configurations by \
                  running repeated timed encodes and reducing them against per-group baselines."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug-level logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs the measurement pass and writes the raw store
    Run(RunArgs),
    /// Computes relative complexity from an existing raw store
    Reduce(ReduceArgs),
    /// Prints the probed geometry and frame count of a clip
    Probe(ProbeArgs),
    /// Lists the configured variants, marking each group's baseline
    Variants(VariantsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Optional: TOML benchmark configuration
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Clip to measure as ID=PATH; repeatable, replaces configured clips
    #[arg(long = "clip", value_name = "ID=PATH", value_parser = parse_clip_arg)]
    pub clips: Vec<ClipSpec>,

    /// Measured runs per clip and variant
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub repeats: Option<u32>,

    /// Raw store to write
    #[arg(long, value_name = "PATH")]
    pub raw: Option<PathBuf>,

    /// Directory for the run log and per-repeat report logs
    #[arg(short, long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Keep encoded outputs in this directory instead of discarding them
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Run the reducer after measuring
    #[arg(long, default_value_t = false)]
    pub reduce: bool,

    /// Summary store written by --reduce
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ReduceArgs {
    /// Raw store to read
    #[arg(long, value_name = "PATH")]
    pub raw: Option<PathBuf>,

    /// Summary store to write
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Optional: TOML configuration supplying baselines and store paths
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Clip to probe
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Frame rate assumed when the stream reports a zero denominator
    #[arg(long, value_name = "FPS")]
    pub default_fps: Option<f64>,

    /// ffprobe binary (defaults to the configured one)
    #[arg(long, value_name = "PROGRAM")]
    pub ffprobe: Option<String>,

    /// Optional: TOML configuration supplying the frame rate default and tools
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct VariantsArgs {
    /// Optional: TOML configuration to list instead of the built-in table
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Parses `ID=PATH` into a clip.
pub fn parse_clip_arg(value: &str) -> Result<ClipSpec, String> {
    let (id, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected ID=PATH, got '{value}'"))?;
    let id = id.trim();
    if id.is_empty() || path.is_empty() {
        return Err(format!("expected ID=PATH, got '{value}'"));
    }
    Ok(ClipSpec::new(id, path))
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
