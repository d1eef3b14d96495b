//! File logging for benchmark runs.
//!
//! When a run has a log directory, everything that goes through the `log`
//! facade is written both to the console and to a timestamped run log next to
//! the per-repeat report logs.

use anyhow::Result;
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::path::{Path, PathBuf};

use crate::utils::file_timestamp;

/// Path of a new run log inside `log_dir`: `rcbench_run_<YYYYMMDD_HHMMSS>.log`.
pub fn run_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("rcbench_run_{}.log", file_timestamp()))
}

/// Installs log4rs as the global logger with a console and a file appender.
///
/// Fails if a global logger is already installed.
pub fn setup_file_logging(log_file: &Path, log_level: LevelFilter) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}",
        )))
        .build(log_file)?;

    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{m}{n}")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .build(
            Root::builder()
                .appender("file")
                .appender("console")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    Ok(())
}
