//! TOML configuration files.
//!
//! Every key is optional; anything left out keeps its built-in default. A
//! `[[variants]]` or `[baselines]` table replaces the built-in one wholesale.
//!
//! ```toml
//! repeats = 5
//! log_dir = "exp_logs"
//!
//! [encode]
//! qp = 28
//!
//! [[clips]]
//! id = "T1"
//! path = "traffic_720p30.mp4"
//! ```

use std::fs;
use std::path::Path;

use super::BenchConfig;
use crate::error::{CoreError, CoreResult};

impl BenchConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        toml::from_str(text).map_err(|e| CoreError::Config(format!("invalid config: {e}")))
    }

    /// Loads a configuration file, resolving relative clip, log, scratch and
    /// store paths against the file's directory.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        log::debug!("Loading configuration from {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&text)?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            for clip in &mut config.clips {
                if clip.path.is_relative() {
                    clip.path = base.join(&clip.path);
                }
            }
            for dir in [&mut config.log_dir, &mut config.scratch_dir].into_iter().flatten() {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
            for store in [&mut config.raw_csv, &mut config.summary_csv] {
                if store.is_relative() {
                    *store = base.join(&*store);
                }
            }
        }

        Ok(config)
    }
}
