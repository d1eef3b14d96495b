// ============================================================================
// rcbench-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP
//
// Console output goes through `env_logger`; RUST_LOG, when set, refines the
// level chosen by --verbose. A `run` with a log directory instead installs
// rcbench-core's log4rs configuration, which writes to both the console and
// a timestamped run log.

use log::LevelFilter;
use rcbench_core::CoreError;
use rcbench_core::logging::{run_log_path, setup_file_logging};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::CliResult;

/// Maps the --verbose flag to a level.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs a console-only logger printing bare messages at info level.
pub fn init_console_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            other => writeln!(buf, "[{}] {}", other, record.args()),
        })
        .try_init();
}

/// Installs console + file logging under `log_dir`, returning the run log path.
pub fn init_file_logging(level: LevelFilter, log_dir: &Path) -> CliResult<PathBuf> {
    let log_path = run_log_path(log_dir);
    setup_file_logging(&log_path, level).map_err(|e| {
        CoreError::OperationFailed(format!(
            "Failed to set up file logging to {}: {}",
            log_path.display(),
            e
        ))
    })?;
    Ok(log_path)
}
