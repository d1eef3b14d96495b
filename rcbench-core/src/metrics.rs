//! Normalized cost metrics.
//!
//! Elapsed time is divided by the amount of work the encoder did so that
//! clips of different length and resolution can be compared. A metric whose
//! inputs are missing or whose denominator is zero is left undefined rather
//! than reported as zero cost.

/// Time-based metrics derived from a median elapsed time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedMetrics {
    /// Milliseconds of wall-clock time per encoded frame
    pub time_per_frame_ms: Option<f64>,
    /// Milliseconds per frame per megapixel of frame area
    pub time_per_mp_per_frame_ms: Option<f64>,
}

impl DerivedMetrics {
    /// Derives metrics from median elapsed seconds, frame count and megapixels.
    pub fn derive(elapsed_s: Option<f64>, frames: u64, megapixels: f64) -> Self {
        let Some(elapsed) = elapsed_s else {
            return Self::default();
        };
        if frames == 0 {
            return Self::default();
        }

        let frames = frames as f64;
        let time_per_frame_ms = Some(elapsed / frames * 1000.0);
        let time_per_mp_per_frame_ms =
            (megapixels > 0.0).then(|| elapsed / (frames * megapixels) * 1000.0);

        Self {
            time_per_frame_ms,
            time_per_mp_per_frame_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MP_720P: f64 = 1280.0 * 720.0 / 1e6;

    #[test]
    fn test_derive_720p_baseline() {
        let m = DerivedMetrics::derive(Some(30.0), 300, MP_720P);
        assert!((m.time_per_frame_ms.unwrap() - 100.0).abs() < 1e-9);
        assert!((m.time_per_mp_per_frame_ms.unwrap() - 108.506944).abs() < 1e-5);
    }

    #[test]
    fn test_derive_720p_slower_variant() {
        let m = DerivedMetrics::derive(Some(45.0), 300, MP_720P);
        assert!((m.time_per_frame_ms.unwrap() - 150.0).abs() < 1e-9);
        assert!((m.time_per_mp_per_frame_ms.unwrap() - 162.760417).abs() < 1e-5);
    }

    #[test]
    fn test_missing_elapsed_leaves_metrics_undefined() {
        assert_eq!(DerivedMetrics::derive(None, 300, MP_720P), DerivedMetrics::default());
    }

    #[test]
    fn test_zero_frames_leaves_metrics_undefined() {
        let m = DerivedMetrics::derive(Some(30.0), 0, MP_720P);
        assert_eq!(m.time_per_frame_ms, None);
        assert_eq!(m.time_per_mp_per_frame_ms, None);
    }

    #[test]
    fn test_zero_megapixels_only_drops_area_metric() {
        let m = DerivedMetrics::derive(Some(30.0), 300, 0.0);
        assert_eq!(m.time_per_frame_ms, Some(100.0));
        assert_eq!(m.time_per_mp_per_frame_ms, None);
    }
}
