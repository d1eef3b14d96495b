// ============================================================================
// rcbench-core/src/reduce.rs
// ============================================================================
//
// RELATIVE-COMPLEXITY REDUCER
//
// A stateless pass over a completed raw store. Rows are partitioned by
// (clip_id, group); within each partition every row's per-megapixel-frame
// cost is expressed as a percentage of the group's baseline variant.
//
// Rules:
// - partitions keep first-appearance order, rows keep file order
// - a partition whose baseline row is absent, or whose baseline metric is not
//   a positive number, is skipped entirely
// - a row whose own metric is not a positive number gets an empty RC cell
// - pass-through cells are copied verbatim
//
// Partitions are independent, so they are reduced in parallel; collection
// preserves their order, keeping the output byte-identical across runs.

use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::BaselineMap;
use crate::error::{CoreError, CoreResult};
use crate::store::{RawRecord, read_raw};

/// Header of the summary store, in column order.
pub const SUMMARY_COLUMNS: [&str; 11] = [
    "clip_id",
    "group",
    "name",
    "width",
    "height",
    "frames",
    "time_per_frame_ms",
    "time_per_MP_per_frame_ms",
    "RC_vs_baseline_%",
    "bitrate_Mbps",
    "psnr_dB",
];

/// One output row of the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub clip_id: String,
    pub group: String,
    pub name: String,
    pub width: String,
    pub height: String,
    pub frames: String,
    pub time_per_frame_ms: String,
    pub time_per_mp_per_frame_ms: String,
    /// Formatted with one decimal, empty when undefined
    pub rc_vs_baseline_pct: String,
    pub bitrate_mbps: String,
    pub psnr_db: String,
}

impl SummaryRow {
    fn from_record(record: &RawRecord, rc: Option<f64>) -> Self {
        Self {
            clip_id: record.clip_id.clone(),
            group: record.group.clone(),
            name: record.name.clone(),
            width: record.width.clone(),
            height: record.height.clone(),
            frames: record.frames.clone(),
            time_per_frame_ms: record.time_per_frame_ms.clone(),
            time_per_mp_per_frame_ms: record.time_per_mp_per_frame_ms.clone(),
            rc_vs_baseline_pct: rc.map(|v| format!("{v:.1}")).unwrap_or_default(),
            bitrate_mbps: record.bitrate_mbps.clone(),
            psnr_db: record.psnr_db.clone(),
        }
    }

    /// Cells in [`SUMMARY_COLUMNS`] order.
    pub fn to_record(&self) -> [&str; 11] {
        [
            &self.clip_id,
            &self.group,
            &self.name,
            &self.width,
            &self.height,
            &self.frames,
            &self.time_per_frame_ms,
            &self.time_per_mp_per_frame_ms,
            &self.rc_vs_baseline_pct,
            &self.bitrate_mbps,
            &self.psnr_db,
        ]
    }
}

/// Why a partition produced no output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnknownGroup,
    MissingBaseline(String),
    InvalidBaselineMetric(String),
}

/// Result of reducing one raw store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReduceStats {
    pub rows_read: usize,
    pub partitions: usize,
    /// Rows written to the summary store, in output order
    pub rows: Vec<SummaryRow>,
    /// (clip_id, group, reason) for every skipped partition
    pub skipped: Vec<(String, String, SkipReason)>,
}

impl ReduceStats {
    pub fn rows_written(&self) -> usize {
        self.rows.len()
    }
}

struct Partition<'a> {
    clip_id: &'a str,
    group: &'a str,
    rows: Vec<&'a RawRecord>,
}

/// Parses a metric cell, accepting only positive finite values.
fn positive_metric(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn partition(records: &[RawRecord]) -> Vec<Partition<'_>> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut partitions: Vec<Partition<'_>> = Vec::new();
    for record in records {
        let key = (record.clip_id.as_str(), record.group.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            partitions.push(Partition {
                clip_id: key.0,
                group: key.1,
                rows: Vec::new(),
            });
            partitions.len() - 1
        });
        partitions[slot].rows.push(record);
    }
    partitions
}

fn reduce_partition(
    part: &Partition<'_>,
    baselines: &BaselineMap,
) -> Result<Vec<SummaryRow>, SkipReason> {
    let base_name = baselines
        .baseline_for(part.group)
        .ok_or(SkipReason::UnknownGroup)?;

    let mut candidates = part.rows.iter().filter(|r| r.name == base_name);
    let base = candidates
        .next()
        .ok_or_else(|| SkipReason::MissingBaseline(base_name.to_string()))?;
    let duplicates = candidates.count();
    if duplicates > 0 {
        log::warn!(
            "{} / {}: {} duplicate baseline rows for '{}', using the first",
            part.clip_id,
            part.group,
            duplicates,
            base_name
        );
    }

    let base_metric = positive_metric(&base.time_per_mp_per_frame_ms).ok_or_else(|| {
        SkipReason::InvalidBaselineMetric(base.time_per_mp_per_frame_ms.clone())
    })?;

    Ok(part
        .rows
        .iter()
        .map(|row| {
            let rc = positive_metric(&row.time_per_mp_per_frame_ms)
                .map(|metric| 100.0 * metric / base_metric);
            SummaryRow::from_record(row, rc)
        })
        .collect())
}

/// Reduces raw records to summary rows.
///
/// Returns the rows in output order together with every skipped partition.
pub fn reduce_records(
    records: &[RawRecord],
    baselines: &BaselineMap,
) -> (Vec<SummaryRow>, Vec<(String, String, SkipReason)>) {
    let partitions = partition(records);

    let outcomes: Vec<Result<Vec<SummaryRow>, SkipReason>> = partitions
        .par_iter()
        .map(|part| reduce_partition(part, baselines))
        .collect();

    let mut rows = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    for (part, outcome) in partitions.iter().zip(outcomes) {
        match outcome {
            Ok(mut part_rows) => rows.append(&mut part_rows),
            Err(reason) => {
                match &reason {
                    SkipReason::UnknownGroup => log::warn!(
                        "Skipping {} / {}: no baseline configured for group",
                        part.clip_id,
                        part.group
                    ),
                    SkipReason::MissingBaseline(name) => log::warn!(
                        "Skipping {} / {}: baseline '{}' not present",
                        part.clip_id,
                        part.group,
                        name
                    ),
                    SkipReason::InvalidBaselineMetric(cell) => log::warn!(
                        "Skipping {} / {}: baseline metric '{}' is not a positive number",
                        part.clip_id,
                        part.group,
                        cell
                    ),
                }
                skipped.push((part.clip_id.to_string(), part.group.to_string(), reason));
            }
        }
    }
    (rows, skipped)
}

/// Writes summary rows (header always included) to `path`.
pub fn write_summary(path: &Path, rows: &[SummaryRow]) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CoreError::PathError(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(SUMMARY_COLUMNS)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads the raw store at `raw`, reduces it and writes the summary store.
pub fn reduce_file(raw: &Path, summary: &Path, baselines: &BaselineMap) -> CoreResult<ReduceStats> {
    let records = read_raw(raw)?;
    let partitions = partition(&records).len();
    let (rows, skipped) = reduce_records(&records, baselines);
    write_summary(summary, &rows)?;

    log::info!(
        "Reduced {} raw rows in {} partitions to {} summary rows ({} skipped) -> {}",
        records.len(),
        partitions,
        rows.len(),
        skipped.len(),
        summary.display()
    );

    Ok(ReduceStats {
        rows_read: records.len(),
        partitions,
        rows,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(clip: &str, group: &str, name: &str, metric: &str) -> RawRecord {
        RawRecord {
            clip_id: clip.to_string(),
            group: group.to_string(),
            name: name.to_string(),
            width: "1280".to_string(),
            height: "720".to_string(),
            frames: "300".to_string(),
            time_per_frame_ms: "100".to_string(),
            time_per_mp_per_frame_ms: metric.to_string(),
            bitrate_mbps: String::new(),
            psnr_db: String::new(),
        }
    }

    fn baselines() -> BaselineMap {
        BaselineMap::new()
            .with("me", "dia")
            .with("part", "p16")
    }

    #[test]
    fn test_baseline_row_is_exactly_100() {
        let records = vec![
            record("T1", "me", "dia", "108.506944"),
            record("T1", "me", "hex", "162.760417"),
        ];
        let (rows, skipped) = reduce_records(&records, &baselines());
        assert!(skipped.is_empty());
        assert_eq!(rows[0].rc_vs_baseline_pct, "100.0");
        assert_eq!(rows[1].rc_vs_baseline_pct, "150.0");
    }

    #[test]
    fn test_rc_is_linear_in_metric() {
        let records = vec![
            record("T1", "me", "dia", "20"),
            record("T1", "me", "hex", "30"),
            record("T1", "me", "umh", "60"),
        ];
        let (rows, _) = reduce_records(&records, &baselines());
        let rc: Vec<&str> = rows.iter().map(|r| r.rc_vs_baseline_pct.as_str()).collect();
        assert_eq!(rc, vec!["100.0", "150.0", "300.0"]);
    }

    #[test]
    fn test_missing_baseline_skips_partition() {
        let records = vec![
            record("T1", "me", "hex", "30"),
            record("T1", "part", "p16", "10"),
        ];
        let (rows, skipped) = reduce_records(&records, &baselines());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group, "part");
        assert_eq!(
            skipped,
            vec![(
                "T1".to_string(),
                "me".to_string(),
                SkipReason::MissingBaseline("dia".to_string())
            )]
        );
    }

    #[test]
    fn test_invalid_baseline_metric_skips_partition() {
        for bad in ["", "0", "-3", "abc"] {
            let records = vec![record("T1", "me", "dia", bad), record("T1", "me", "hex", "30")];
            let (rows, skipped) = reduce_records(&records, &baselines());
            assert!(rows.is_empty(), "baseline metric {bad:?} should skip");
            assert!(matches!(skipped[0].2, SkipReason::InvalidBaselineMetric(_)));
        }
    }

    #[test]
    fn test_unknown_group_skips_partition() {
        let records = vec![record("T1", "entropy", "CAVLC", "10")];
        let (rows, skipped) = reduce_records(&records, &baselines());
        assert!(rows.is_empty());
        assert_eq!(skipped[0].2, SkipReason::UnknownGroup);
    }

    #[test]
    fn test_row_with_missing_metric_gets_empty_rc() {
        let records = vec![record("T1", "me", "dia", "20"), record("T1", "me", "esa", "")];
        let (rows, _) = reduce_records(&records, &baselines());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].rc_vs_baseline_pct, "");
        assert_eq!(rows[1].time_per_mp_per_frame_ms, "");
    }

    #[test]
    fn test_non_positive_row_metric_gets_empty_rc() {
        let records = vec![
            record("T1", "me", "dia", "20"),
            record("T1", "me", "umh", "0"),
            record("T1", "me", "esa", "-5"),
        ];
        let (rows, skipped) = reduce_records(&records, &baselines());
        assert!(skipped.is_empty());
        let rc: Vec<&str> = rows.iter().map(|r| r.rc_vs_baseline_pct.as_str()).collect();
        assert_eq!(rc, vec!["100.0", "", ""]);
        assert_eq!(rows[1].time_per_mp_per_frame_ms, "0");
        assert_eq!(rows[2].time_per_mp_per_frame_ms, "-5");
    }

    #[test]
    fn test_duplicate_baseline_uses_first() {
        let records = vec![
            record("T1", "me", "dia", "20"),
            record("T1", "me", "dia", "40"),
        ];
        let (rows, _) = reduce_records(&records, &baselines());
        assert_eq!(rows[0].rc_vs_baseline_pct, "100.0");
        assert_eq!(rows[1].rc_vs_baseline_pct, "200.0");
    }

    #[test]
    fn test_partitions_keep_first_appearance_order() {
        let records = vec![
            record("P1", "part", "p16", "10"),
            record("T1", "me", "dia", "20"),
            record("P1", "part", "p8", "15"),
            record("T1", "me", "hex", "25"),
        ];
        let (rows, _) = reduce_records(&records, &baselines());
        let order: Vec<(&str, &str)> =
            rows.iter().map(|r| (r.clip_id.as_str(), r.name.as_str())).collect();
        assert_eq!(
            order,
            vec![("P1", "p16"), ("P1", "p8"), ("T1", "dia"), ("T1", "hex")]
        );
    }

    #[test]
    fn test_pass_through_cells_are_verbatim() {
        let mut rec = record("T1", "me", "dia", "108.506944");
        rec.time_per_frame_ms = "100.000000".to_string();
        rec.psnr_db = "38.20".to_string();
        let (rows, _) = reduce_records(&[rec], &baselines());
        assert_eq!(rows[0].time_per_frame_ms, "100.000000");
        assert_eq!(rows[0].time_per_mp_per_frame_ms, "108.506944");
        assert_eq!(rows[0].psnr_db, "38.20");
    }

    #[test]
    fn test_empty_result_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        write_summary(&path, &[]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "clip_id,group,name,width,height,frames,time_per_frame_ms,\
             time_per_MP_per_frame_ms,RC_vs_baseline_%,bitrate_Mbps,psnr_dB\n"
        );
    }
}
