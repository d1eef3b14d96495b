// ============================================================================
// rcbench-core/src/store/raw.rs
// ============================================================================
//
// RAW STORE: Per-(clip, variant) Aggregates
//
// Writes one CSV row per (clip, variant) after all repeats have completed and
// reads the rows back for the reducer. The writer flushes after every row so
// an interrupted run keeps everything measured so far.
//
// Cell formatting:
// - fps and duration_s are rounded to 3 decimals
// - time figures and derived metrics are rounded to 6 decimals
// - missing values are empty cells, never zero
// - bitrate_Mbps and psnr_dB are empty placeholders

use serde::Deserialize;
use std::fs::{self, File};
use std::path::Path;

use crate::aggregate::AggregatedMeasurement;
use crate::config::Variant;
use crate::error::{CoreError, CoreResult};
use crate::media::ClipInfo;
use crate::metrics::DerivedMetrics;
use crate::utils::{format_cell, round_to};

/// Header of the raw store, in column order.
pub const RAW_COLUMNS: [&str; 19] = [
    "ts",
    "clip_id",
    "clip_path",
    "group",
    "name",
    "repeat_count",
    "width",
    "height",
    "fps",
    "duration_s",
    "frames",
    "elapsed_s",
    "user_s",
    "sys_s",
    "maxrss_kb",
    "time_per_frame_ms",
    "time_per_MP_per_frame_ms",
    "bitrate_Mbps",
    "psnr_dB",
];

/// One persisted row of the raw store.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    pub ts: String,
    pub clip_id: String,
    pub clip_path: String,
    pub group: String,
    pub name: String,
    pub repeat_count: usize,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub duration_s: f64,
    pub frames: u64,
    pub measurement: AggregatedMeasurement,
    pub metrics: DerivedMetrics,
}

impl AggregatedRow {
    pub fn new(
        clip: &ClipInfo,
        variant: &Variant,
        measurement: AggregatedMeasurement,
        metrics: DerivedMetrics,
        ts: impl Into<String>,
    ) -> Self {
        Self {
            ts: ts.into(),
            clip_id: clip.clip_id.clone(),
            clip_path: clip.path.display().to_string(),
            group: variant.group.clone(),
            name: variant.name.clone(),
            repeat_count: measurement.repeats,
            width: clip.width,
            height: clip.height,
            fps: clip.frame_rate,
            duration_s: clip.duration_s,
            frames: clip.frames,
            measurement,
            metrics,
        }
    }

    /// Cells in [`RAW_COLUMNS`] order.
    pub fn to_record(&self) -> Vec<String> {
        let m = &self.measurement;
        vec![
            self.ts.clone(),
            self.clip_id.clone(),
            self.clip_path.clone(),
            self.group.clone(),
            self.name.clone(),
            self.repeat_count.to_string(),
            self.width.to_string(),
            self.height.to_string(),
            round_to(self.fps, 3).to_string(),
            round_to(self.duration_s, 3).to_string(),
            self.frames.to_string(),
            format_cell(m.elapsed_s, 6),
            format_cell(m.user_s, 6),
            format_cell(m.sys_s, 6),
            format_cell(m.maxrss_kb, 6),
            format_cell(self.metrics.time_per_frame_ms, 6),
            format_cell(self.metrics.time_per_mp_per_frame_ms, 6),
            String::new(),
            String::new(),
        ]
    }
}

/// Append-only writer for the raw store.
pub struct RawStoreWriter {
    writer: csv::Writer<File>,
    rows: usize,
}

impl RawStoreWriter {
    /// Creates (or truncates) the store at `path` and writes the header.
    pub fn create(path: &Path) -> CoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CoreError::PathError(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(RAW_COLUMNS)?;
        writer.flush()?;
        log::debug!("Opened raw store {}", path.display());
        Ok(Self { writer, rows: 0 })
    }

    /// Appends one row and flushes it to disk.
    pub fn append(&mut self, row: &AggregatedRow) -> CoreResult<()> {
        self.writer.write_record(row.to_record())?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows appended since the store was created.
    pub fn rows_written(&self) -> usize {
        self.rows
    }
}

/// Raw store row as read by the reducer. Every cell is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    pub clip_id: String,
    pub group: String,
    pub name: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub frames: String,
    #[serde(default)]
    pub time_per_frame_ms: String,
    #[serde(rename = "time_per_MP_per_frame_ms", default)]
    pub time_per_mp_per_frame_ms: String,
    #[serde(rename = "bitrate_Mbps", default)]
    pub bitrate_mbps: String,
    #[serde(rename = "psnr_dB", default)]
    pub psnr_db: String,
}

/// Reads every row of a raw store, in file order.
pub fn read_raw(path: &Path) -> CoreResult<Vec<RawRecord>> {
    if !path.is_file() {
        return Err(CoreError::PathError(format!(
            "raw store not found: {}",
            path.display()
        )));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize::<RawRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("Read {} rows from {}", records.len(), path.display());
    Ok(records)
}
