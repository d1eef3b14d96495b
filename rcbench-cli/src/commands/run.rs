//! Implementation of the 'run' subcommand.
//!
//! Resolves the benchmark configuration from file, environment and flags,
//! checks the external tools, runs the measurement pass and optionally the
//! reduction straight after it.

use log::info;
use rcbench_core::config::{BenchConfig, default_clips};
use rcbench_core::external::ProcessRunner;
use rcbench_core::{check_dependencies, run_benchmark, terminal};

use super::load_config;
use super::reduce::{print_reduce_outcome, reduce_and_report};
use crate::cli::RunArgs;
use crate::error::CliResult;

/// Builds the effective configuration for a run. Flags win over the file.
pub fn resolve_run_config(args: &RunArgs) -> CliResult<BenchConfig> {
    let mut config = load_config(args.config.as_deref())?;

    if !args.clips.is_empty() {
        config.clips = args.clips.clone();
    } else if config.clips.is_empty() {
        config.clips = default_clips();
    }
    if let Some(repeats) = args.repeats {
        config.repeats = repeats as usize;
    }
    if let Some(raw) = &args.raw {
        config.raw_csv = raw.clone();
    }
    if let Some(summary) = &args.summary {
        config.summary_csv = summary.clone();
    }
    if let Some(dir) = &args.log_dir {
        config.log_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.scratch_dir {
        config.scratch_dir = Some(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Runs the measurement pass (and reduction if requested) with `runner`.
pub fn run_bench<R: ProcessRunner>(
    runner: &R,
    config: &BenchConfig,
    reduce: bool,
) -> CliResult<()> {
    terminal::print_section("rcbench");
    info!("Run started: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    if let Some(dir) = &config.log_dir {
        terminal::print_status("Log directory", &dir.display().to_string(), false);
    }

    check_dependencies(runner, config)?;

    let report = run_benchmark(runner, config)?;
    for (clip_id, reason) in &report.failed_clips {
        terminal::print_warning(&format!("Clip {clip_id} was not measured: {reason}"));
    }

    if reduce {
        let outcome = reduce_and_report(&config.raw_csv, &config.summary_csv, &config.baselines)?;
        print_reduce_outcome(&outcome, &config.summary_csv);
    }

    info!("Run finished: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}
