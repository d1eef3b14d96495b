//! Clip metadata and probing
//!
//! This module resolves the geometry, frame rate and frame count of each clip
//! under test by querying ffprobe. Nothing can be measured for a clip whose
//! geometry cannot be resolved, so every failure here is fatal for that clip.

pub mod info;
pub mod probe;

// Re-export commonly used types
pub use info::ClipInfo;
pub use probe::{ClipProber, parse_frame_rate, parse_probe_output, resolve_frame_count};
