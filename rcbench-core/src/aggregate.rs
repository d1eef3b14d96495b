//! Repetition aggregation.
//!
//! A variant is measured N times against the same clip. Each repeat yields a
//! [`RawMeasurement`] (possibly all-missing if the run failed), and the set is
//! reduced to one [`AggregatedMeasurement`] by taking the median of every
//! metric independently.

use crate::report::ResourceUsage;
use crate::stats::median;

/// Figures from a single repeat. Kept in memory only.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMeasurement {
    pub clip_id: String,
    pub group: String,
    pub name: String,
    /// 1-based repeat number
    pub repeat_index: usize,
    pub usage: ResourceUsage,
}

/// Per-metric medians over the repeats of one (clip, variant).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregatedMeasurement {
    pub elapsed_s: Option<f64>,
    pub user_s: Option<f64>,
    pub sys_s: Option<f64>,
    /// Median peak RSS; fractional when the repeat count is even
    pub maxrss_kb: Option<f64>,
    /// Number of repeats attempted
    pub repeats: usize,
}

impl AggregatedMeasurement {
    /// Median-reduces a set of repeats.
    pub fn from_measurements(measurements: &[RawMeasurement]) -> Self {
        let usages = || measurements.iter().map(|m| m.usage);
        Self {
            elapsed_s: median(usages().map(|u| u.elapsed_s)),
            user_s: median(usages().map(|u| u.user_s)),
            sys_s: median(usages().map(|u| u.sys_s)),
            maxrss_kb: median(usages().map(|u| u.maxrss_kb.map(|kb| kb as f64))),
            repeats: measurements.len(),
        }
    }
}

/// Runs `measure` once per repeat (1..=repeats) and median-reduces the results.
///
/// `measure` returns the usage parsed from that repeat's report, or an
/// all-missing usage when the repeat failed. Every repeat is attempted.
pub fn aggregate<F>(
    clip_id: &str,
    group: &str,
    name: &str,
    repeats: usize,
    mut measure: F,
) -> (AggregatedMeasurement, Vec<RawMeasurement>)
where
    F: FnMut(usize) -> ResourceUsage,
{
    let measurements: Vec<RawMeasurement> = (1..=repeats)
        .map(|repeat_index| RawMeasurement {
            clip_id: clip_id.to_string(),
            group: group.to_string(),
            name: name.to_string(),
            repeat_index,
            usage: measure(repeat_index),
        })
        .collect();

    let missing = measurements.iter().filter(|m| m.usage.elapsed_s.is_none()).count();
    if missing > 0 {
        log::warn!(
            "{} / {}: {} of {} repeats have no elapsed time",
            clip_id,
            name,
            missing,
            repeats
        );
    }

    (AggregatedMeasurement::from_measurements(&measurements), measurements)
}
