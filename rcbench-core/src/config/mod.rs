//! Configuration structures and constants for the rcbench-core library.
//!
//! This module holds everything that is fixed for the duration of a run: the
//! clips under test, the variant table, the per-group baseline mapping, the
//! encode settings shared by every variant, and tool locations. Values are
//! immutable once handed to the orchestrator or the reducer.

mod builder;
mod defaults;
mod file;
pub mod utils;

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};
use crate::runner::OutputSink;

pub use builder::BenchConfigBuilder;
pub use defaults::{default_baselines, default_clips, default_variants};

// Default constants

/// Number of measured runs per (clip, variant).
pub const DEFAULT_REPEATS: usize = 3;

/// Frame rate assumed when the probe reports a `x/0` average frame rate.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Fixed quantizer shared by all variants.
pub const DEFAULT_QP: u32 = 30;

/// Output frame rate passed to the encoder.
pub const DEFAULT_ENCODE_FPS: u32 = 30;

/// GOP length (keyframe interval in frames).
pub const DEFAULT_GOP: u32 = 60;

pub const DEFAULT_PIX_FMT: &str = "yuv420p";
pub const DEFAULT_PROFILE: &str = "high";
pub const DEFAULT_CODEC: &str = "libx264";

pub const DEFAULT_RAW_CSV: &str = "complexity_raw.csv";
pub const DEFAULT_SUMMARY_CSV: &str = "complexity_summary.csv";

/// A clip under test: a short identifier and the path handed to the tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClipSpec {
    pub id: String,
    pub path: PathBuf,
}

impl ClipSpec {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// One encoder configuration under test.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variant {
    /// Experiment dimension this variant belongs to (e.g. "entropy")
    pub group: String,
    /// Display name, also the key used for baseline lookup
    pub name: String,
    /// Opaque parameter string passed as `-x264-params`
    #[serde(alias = "x264")]
    pub x264_params: String,
}

impl Variant {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        x264_params: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            x264_params: x264_params.into(),
        }
    }
}

/// Static group → baseline variant name mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct BaselineMap(BTreeMap<String, String>);

impl BaselineMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds or replaces the baseline for `group`.
    pub fn with(mut self, group: impl Into<String>, name: impl Into<String>) -> Self {
        self.0.insert(group.into(), name.into());
        self
    }

    /// Name of the baseline variant for `group`, if the group is known.
    pub fn baseline_for(&self, group: &str) -> Option<&str> {
        self.0.get(group).map(String::as_str)
    }

    pub fn is_baseline(&self, variant: &Variant) -> bool {
        self.baseline_for(&variant.group) == Some(variant.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(g, n)| (g.as_str(), n.as_str()))
    }
}

impl Default for BaselineMap {
    fn default() -> Self {
        default_baselines()
    }
}

/// Encoder settings held constant across every variant of a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    pub codec: String,
    pub qp: u32,
    pub fps: u32,
    pub gop: u32,
    pub pix_fmt: String,
    pub profile: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            codec: DEFAULT_CODEC.to_string(),
            qp: DEFAULT_QP,
            fps: DEFAULT_ENCODE_FPS,
            gop: DEFAULT_GOP,
            pix_fmt: DEFAULT_PIX_FMT.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
        }
    }
}

/// Locations of the external tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub ffprobe: String,
    pub ffmpeg: String,
    /// Resource accounting wrapper; must understand `-v`
    pub time: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffprobe: "ffprobe".to_string(),
            ffmpeg: "ffmpeg".to_string(),
            time: "/usr/bin/time".to_string(),
        }
    }
}

/// Main configuration structure for a benchmark run.
///
/// Built from defaults, an optional TOML file, environment overrides and
/// finally CLI flags, then validated once before the run starts.
///
/// # Examples
///
/// ```rust
/// use rcbench_core::config::{BenchConfigBuilder, ClipSpec};
///
/// let config = BenchConfigBuilder::new()
///     .clip(ClipSpec::new("T1", "traffic_720p30.mp4"))
///     .repeats(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.repeats, 5);
/// assert_eq!(config.variants.len(), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Clips to measure, in run order
    pub clips: Vec<ClipSpec>,

    /// Variants to run against every clip, in run order
    pub variants: Vec<Variant>,

    /// Baseline variant per group
    pub baselines: BaselineMap,

    /// Encoder settings shared by all variants
    pub encode: EncodeSettings,

    /// Measured runs per (clip, variant)
    pub repeats: usize,

    /// Frame rate used when the probe reports a zero denominator
    pub default_frame_rate: f64,

    /// External tool locations
    pub tools: ToolPaths,

    /// Directory for encoded output; `None` discards output to the null device
    pub scratch_dir: Option<PathBuf>,

    /// Directory for per-repeat report logs; `None` disables them
    pub log_dir: Option<PathBuf>,

    /// Raw store written by the measurement pass
    pub raw_csv: PathBuf,

    /// Summary store written by the reducer
    pub summary_csv: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            clips: Vec::new(),
            variants: default_variants(),
            baselines: default_baselines(),
            encode: EncodeSettings::default(),
            repeats: DEFAULT_REPEATS,
            default_frame_rate: DEFAULT_FRAME_RATE,
            tools: ToolPaths::default(),
            scratch_dir: None,
            log_dir: None,
            raw_csv: PathBuf::from(DEFAULT_RAW_CSV),
            summary_csv: PathBuf::from(DEFAULT_SUMMARY_CSV),
        }
    }
}

impl BenchConfig {
    /// Applies `RCBENCH_*` environment variable overrides.
    pub fn with_env_overrides(mut self) -> Self {
        self.repeats = utils::get_env_usize("RCBENCH_REPEATS", self.repeats);
        self.default_frame_rate =
            utils::get_env_f64("RCBENCH_DEFAULT_FPS", self.default_frame_rate);
        self.tools.ffmpeg = utils::get_env_string("RCBENCH_FFMPEG", self.tools.ffmpeg);
        self.tools.ffprobe = utils::get_env_string("RCBENCH_FFPROBE", self.tools.ffprobe);
        self.tools.time = utils::get_env_string("RCBENCH_TIME", self.tools.time);
        self
    }

    /// Where encoded bitstreams go during measured runs.
    pub fn output_sink(&self) -> OutputSink {
        match &self.scratch_dir {
            Some(dir) => OutputSink::Scratch(dir.clone()),
            None => OutputSink::Discard,
        }
    }

    /// Total number of measured runs the configuration describes.
    pub fn total_runs(&self) -> usize {
        self.clips.len() * self.variants.len() * self.repeats
    }

    /// Checks the invariants a measurement pass relies on.
    pub fn validate(&self) -> CoreResult<()> {
        if self.repeats == 0 {
            return Err(CoreError::Config("repeats must be at least 1".to_string()));
        }
        if !(self.default_frame_rate.is_finite() && self.default_frame_rate > 0.0) {
            return Err(CoreError::Config(format!(
                "default frame rate must be positive, got {}",
                self.default_frame_rate
            )));
        }
        if self.encode.fps == 0 || self.encode.gop == 0 {
            return Err(CoreError::Config("encode fps and gop must be positive".to_string()));
        }
        if self.clips.is_empty() {
            return Err(CoreError::Config("no clips configured".to_string()));
        }
        if self.variants.is_empty() {
            return Err(CoreError::Config("no variants configured".to_string()));
        }

        let mut clip_ids = HashSet::new();
        for clip in &self.clips {
            if clip.id.trim().is_empty() {
                return Err(CoreError::Config(format!(
                    "clip '{}' has an empty id",
                    clip.path.display()
                )));
            }
            if !clip_ids.insert(clip.id.as_str()) {
                return Err(CoreError::Config(format!("duplicate clip id '{}'", clip.id)));
            }
        }

        let mut keys = HashSet::new();
        for variant in &self.variants {
            if !keys.insert((variant.group.as_str(), variant.name.as_str())) {
                return Err(CoreError::Config(format!(
                    "duplicate variant '{}' in group '{}'",
                    variant.name, variant.group
                )));
            }
        }

        for group in self.groups() {
            let baseline = self.baselines.baseline_for(group).ok_or_else(|| {
                CoreError::Config(format!("group '{group}' has no baseline"))
            })?;
            if !keys.contains(&(group, baseline)) {
                return Err(CoreError::Config(format!(
                    "baseline '{baseline}' of group '{group}' is not among its variants"
                )));
            }
        }

        Ok(())
    }

    /// Distinct variant groups in first-appearance order.
    pub fn groups(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.variants
            .iter()
            .map(|v| v.group.as_str())
            .filter(|g| seen.insert(*g))
            .collect()
    }
}
