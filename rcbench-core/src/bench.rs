// ============================================================================
// rcbench-core/src/bench.rs
// ============================================================================
//
// BENCHMARK ORCHESTRATOR
//
// Drives the measurement pass: for each clip, for each variant, for each
// repeat, one blocking measured encode. The loop is strictly sequential so
// that runs never compete for the machine. Failures degrade to missing data:
//
// - a clip that cannot be probed is skipped, the rest of the run continues
// - a repeat that fails to start or exits non-zero contributes no figures
// - an unwritable raw store aborts the run
//
// KEY COMPONENTS:
// - check_dependencies: verifies the external tools can be started
// - run_benchmark: the clip × variant × repeat loop
// - BenchReport: what the pass produced

use std::path::PathBuf;
use std::time::Instant;

use crate::aggregate::aggregate;
use crate::config::BenchConfig;
use crate::error::CoreResult;
use crate::external::{ProcessRunner, check_dependency};
use crate::media::ClipProber;
use crate::metrics::DerivedMetrics;
use crate::report::ResourceUsage;
use crate::runner::VariantRunner;
use crate::store::{AggregatedRow, RawStoreWriter};
use crate::terminal;
use crate::utils::{format_duration, iso_timestamp};

/// Outcome of a measurement pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchReport {
    /// Raw store the rows were written to
    pub raw_csv: PathBuf,
    /// One per measured (clip, variant)
    pub rows_written: usize,
    /// Measured encodes attempted
    pub runs_attempted: usize,
    /// Attempted encodes that yielded no elapsed time
    pub runs_failed: usize,
    /// (clip_id, reason) for every clip skipped after a probe failure
    pub failed_clips: Vec<(String, String)>,
}

/// Checks that ffprobe, ffmpeg and the time wrapper can be started.
pub fn check_dependencies<R: ProcessRunner>(runner: &R, config: &BenchConfig) -> CoreResult<()> {
    log::info!("Checking for required external commands...");
    check_dependency(runner, &config.tools.ffprobe, "-version")?;
    check_dependency(runner, &config.tools.ffmpeg, "-version")?;
    check_dependency(runner, &config.tools.time, "--version")?;
    log::info!("External dependency check passed.");
    Ok(())
}

/// Runs the full measurement pass described by `config`.
///
/// The configuration is validated first. Rows are appended to
/// `config.raw_csv` as each (clip, variant) completes.
pub fn run_benchmark<R: ProcessRunner>(
    runner: &R,
    config: &BenchConfig,
) -> CoreResult<BenchReport> {
    config.validate()?;

    // ========================================================================
    // STEP 1: OPEN THE RAW STORE
    // ========================================================================

    let mut store = RawStoreWriter::create(&config.raw_csv)?;
    let mut report = BenchReport {
        raw_csv: config.raw_csv.clone(),
        ..Default::default()
    };

    let prober = ClipProber::new(runner, config.tools.ffprobe.as_str(), config.default_frame_rate);
    let variant_runner = VariantRunner::new(runner, &config.tools, &config.encode)
        .with_sink(config.output_sink())
        .with_log_dir(config.log_dir.clone());

    let runs_per_clip = config.variants.len() * config.repeats;
    let started = Instant::now();

    terminal::print_section("Measurement");
    terminal::print_status("Clips", &config.clips.len().to_string(), false);
    terminal::print_status("Variants", &config.variants.len().to_string(), false);
    terminal::print_status("Repeats", &config.repeats.to_string(), false);
    terminal::print_status("Raw store", &config.raw_csv.display().to_string(), false);
    terminal::start_run_progress(config.total_runs() as u64);

    // ========================================================================
    // STEP 2: MEASURE EACH CLIP
    // ========================================================================

    for clip_spec in &config.clips {
        let clip = match prober.probe(clip_spec) {
            Ok(clip) => clip,
            Err(e) => {
                log::error!("Skipping clip {}: {}", clip_spec.id, e);
                terminal::print_warning(&format!("Skipping clip {}: {}", clip_spec.id, e));
                report.failed_clips.push((clip_spec.id.clone(), e.to_string()));
                terminal::skip_run_progress(runs_per_clip as u64);
                continue;
            }
        };

        terminal::print_processing(&format!("Clip {} ({})", clip.clip_id, clip.path.display()));
        terminal::print_status("Resolution", &format!("{}x{}", clip.width, clip.height), false);
        terminal::print_status("Frames", &clip.frames.to_string(), clip.frames_estimated);

        // ====================================================================
        // STEP 2.1: RUN EACH VARIANT N TIMES
        // ====================================================================

        for variant in &config.variants {
            let (measurement, raw) =
                aggregate(&clip.clip_id, &variant.group, &variant.name, config.repeats, |repeat| {
                    let usage = match variant_runner.run(&clip, variant, repeat) {
                        Ok(run) if run.succeeded => ResourceUsage::parse(&run.text),
                        Ok(_) => ResourceUsage::default(),
                        Err(e) => {
                            log::warn!(
                                "Repeat {} of {} / {} failed to run: {}",
                                repeat,
                                clip.clip_id,
                                variant.name,
                                e
                            );
                            ResourceUsage::default()
                        }
                    };
                    terminal::advance_run_progress(&format!(
                        "{} / {} r{}",
                        clip.clip_id, variant.name, repeat
                    ));
                    usage
                });

            report.runs_attempted += raw.len();
            report.runs_failed += raw.iter().filter(|m| m.usage.elapsed_s.is_none()).count();

            // ================================================================
            // STEP 2.2: DERIVE METRICS AND PERSIST
            // ================================================================

            let metrics =
                DerivedMetrics::derive(measurement.elapsed_s, clip.frames, clip.megapixels());
            let row = AggregatedRow::new(&clip, variant, measurement, metrics, iso_timestamp());
            if let Err(e) = store.append(&row) {
                terminal::clear_progress_bar();
                log::error!("Cannot append to {}: {}", config.raw_csv.display(), e);
                return Err(e);
            }
            report.rows_written += 1;

            log::debug!(
                "{} / {} / {}: elapsed={:?} tpf_ms={:?} tpmpf_ms={:?}",
                clip.clip_id,
                variant.group,
                variant.name,
                measurement.elapsed_s,
                metrics.time_per_frame_ms,
                metrics.time_per_mp_per_frame_ms
            );
        }
    }

    terminal::finish_progress_bar();

    // ========================================================================
    // STEP 3: REPORT
    // ========================================================================

    terminal::print_success(&format!(
        "Wrote {} rows to {} in {}",
        report.rows_written,
        report.raw_csv.display(),
        format_duration(started.elapsed().as_secs_f64())
    ));
    if report.runs_failed > 0 {
        terminal::print_warning(&format!(
            "{} of {} measured runs produced no timing",
            report.runs_failed, report.runs_attempted
        ));
    }

    Ok(report)
}
