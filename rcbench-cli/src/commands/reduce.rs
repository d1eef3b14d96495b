//! Implementation of the 'reduce' subcommand.
//!
//! Turns a completed raw store into the relative-complexity summary and
//! prints each (clip, group) partition with its RC figures.

use rcbench_core::config::BaselineMap;
use rcbench_core::reduce::{ReduceStats, SkipReason, reduce_file};
use rcbench_core::terminal;
use std::path::Path;

use super::load_config;
use crate::cli::ReduceArgs;
use crate::error::CliResult;

/// Reduces `raw` into `summary` using `baselines`.
pub fn reduce_and_report(
    raw: &Path,
    summary: &Path,
    baselines: &BaselineMap,
) -> CliResult<ReduceStats> {
    terminal::print_section("Relative complexity");
    terminal::print_status("Raw store", &raw.display().to_string(), false);
    reduce_file(raw, summary, baselines)
}

/// Prints the summary rows grouped by partition, then any skipped partitions.
pub fn print_reduce_outcome(stats: &ReduceStats, summary: &Path) {
    let mut current: Option<(&str, &str)> = None;
    for row in &stats.rows {
        let key = (row.clip_id.as_str(), row.group.as_str());
        if current != Some(key) {
            terminal::print_processing(&format!("{} / {}", row.clip_id, row.group));
            current = Some(key);
        }
        let value = if row.rc_vs_baseline_pct.is_empty() {
            "n/a".to_string()
        } else {
            format!("{}%", row.rc_vs_baseline_pct)
        };
        terminal::print_status(&row.name, &value, false);
    }

    for (clip_id, group, reason) in &stats.skipped {
        let why = match reason {
            SkipReason::UnknownGroup => "no baseline configured".to_string(),
            SkipReason::MissingBaseline(name) => format!("baseline '{name}' missing"),
            SkipReason::InvalidBaselineMetric(cell) => format!("baseline metric '{cell}' unusable"),
        };
        terminal::print_warning(&format!("Skipped {clip_id} / {group}: {why}"));
    }

    terminal::print_success(&format!(
        "Wrote {} summary rows ({} of {} partitions) to {}",
        stats.rows_written(),
        stats.partitions - stats.skipped.len(),
        stats.partitions,
        summary.display()
    ));
}

/// Entry point for `rcbench reduce`.
pub fn run_reduce(args: ReduceArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let raw = args.raw.unwrap_or(config.raw_csv);
    let summary = args.summary.unwrap_or(config.summary_csv);

    let stats = reduce_and_report(&raw, &summary, &config.baselines)?;
    print_reduce_outcome(&stats, &summary);
    Ok(())
}
