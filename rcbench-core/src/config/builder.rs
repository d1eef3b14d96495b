// ============================================================================
// rcbench-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for BenchConfig
//
// Fluent construction of BenchConfig on top of its defaults. `build()`
// validates, so a builder never yields a configuration the orchestrator
// would reject.

use std::path::PathBuf;

use super::{BaselineMap, BenchConfig, ClipSpec, EncodeSettings, Variant};
use crate::error::CoreResult;

/// Builder for creating BenchConfig instances.
///
/// # Examples
///
/// ```rust
/// use rcbench_core::config::{BenchConfigBuilder, ClipSpec};
/// use std::path::PathBuf;
///
/// let config = BenchConfigBuilder::new()
///     .clip(ClipSpec::new("P1", "pedestrian_720p30.mp4"))
///     .repeats(3)
///     .log_dir(PathBuf::from("exp_logs"))
///     .raw_csv(PathBuf::from("complexity_raw.csv"))
///     .build()
///     .unwrap();
/// assert_eq!(config.clips.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BenchConfigBuilder {
    config: BenchConfig,
}

impl Default for BenchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchConfigBuilder {
    /// Creates a builder seeded with the built-in defaults.
    pub fn new() -> Self {
        Self {
            config: BenchConfig::default(),
        }
    }

    /// Creates a builder seeded with an existing configuration.
    pub fn from_config(config: BenchConfig) -> Self {
        Self { config }
    }

    /// Appends a clip.
    pub fn clip(mut self, clip: ClipSpec) -> Self {
        self.config.clips.push(clip);
        self
    }

    /// Replaces the clip list.
    pub fn clips(mut self, clips: Vec<ClipSpec>) -> Self {
        self.config.clips = clips;
        self
    }

    /// Replaces the variant table.
    pub fn variants(mut self, variants: Vec<Variant>) -> Self {
        self.config.variants = variants;
        self
    }

    pub fn baselines(mut self, baselines: BaselineMap) -> Self {
        self.config.baselines = baselines;
        self
    }

    pub fn encode(mut self, encode: EncodeSettings) -> Self {
        self.config.encode = encode;
        self
    }

    pub fn repeats(mut self, repeats: usize) -> Self {
        self.config.repeats = repeats;
        self
    }

    pub fn default_frame_rate(mut self, fps: f64) -> Self {
        self.config.default_frame_rate = fps;
        self
    }

    pub fn ffprobe(mut self, program: impl Into<String>) -> Self {
        self.config.tools.ffprobe = program.into();
        self
    }

    pub fn ffmpeg(mut self, program: impl Into<String>) -> Self {
        self.config.tools.ffmpeg = program.into();
        self
    }

    pub fn time_binary(mut self, program: impl Into<String>) -> Self {
        self.config.tools.time = program.into();
        self
    }

    /// Keeps encoded output in `dir` instead of discarding it.
    pub fn scratch_dir(mut self, dir: PathBuf) -> Self {
        self.config.scratch_dir = Some(dir);
        self
    }

    /// Writes every repeat's report to `dir`.
    pub fn log_dir(mut self, dir: PathBuf) -> Self {
        self.config.log_dir = Some(dir);
        self
    }

    pub fn raw_csv(mut self, path: PathBuf) -> Self {
        self.config.raw_csv = path;
        self
    }

    pub fn summary_csv(mut self, path: PathBuf) -> Self {
        self.config.summary_csv = path;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> CoreResult<BenchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without validating it.
    ///
    /// The reducer only needs the baseline map and store paths, so the
    /// `reduce` command builds its configuration this way.
    pub fn build_unchecked(self) -> BenchConfig {
        self.config
    }
}
