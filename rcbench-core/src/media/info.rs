//! Resolved clip metadata.

use std::path::PathBuf;

/// Geometry and timing of a clip, as needed to normalize measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInfo {
    /// Short identifier used in the stores
    pub clip_id: String,
    /// Path handed to the encoder
    pub path: PathBuf,
    /// Width of the video stream in pixels
    pub width: u32,
    /// Height of the video stream in pixels
    pub height: u32,
    /// Average frame rate in frames per second
    pub frame_rate: f64,
    /// Container duration in seconds
    pub duration_s: f64,
    /// Number of frames, reported or estimated
    pub frames: u64,
    /// True when `frames` was derived from duration × frame rate
    pub frames_estimated: bool,
}

impl ClipInfo {
    /// Pixels per frame in millions.
    pub fn megapixels(&self) -> f64 {
        (self.width as f64 * self.height as f64) / 1e6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_megapixels_720p() {
        let info = ClipInfo {
            clip_id: "T1".to_string(),
            path: PathBuf::from("t.mp4"),
            width: 1280,
            height: 720,
            frame_rate: 30.0,
            duration_s: 10.0,
            frames: 300,
            frames_estimated: false,
        };
        assert!((info.megapixels() - 0.9216).abs() < 1e-12);
    }
}
