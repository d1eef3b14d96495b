//! Built-in experiment table.
//!
//! One knob changes per group while everything else is held fixed. The
//! baseline of each group is the cheapest configuration along that knob.

use super::{BaselineMap, ClipSpec, Variant};

/// Sample clips measured when no clips are configured explicitly.
pub fn default_clips() -> Vec<ClipSpec> {
    vec![
        ClipSpec::new("T1", "traffic_720p30.mp4"),
        ClipSpec::new("P1", "pedestrian_720p30.mp4"),
    ]
}

/// The entropy / motion-estimation / partitioning variant table.
pub fn default_variants() -> Vec<Variant> {
    vec![
        // Entropy coding
        Variant::new(
            "entropy",
            "CAVLC + dia + p16x16",
            "cabac=0:me=dia:subme=4:partitions=p16x16,none",
        ),
        Variant::new(
            "entropy",
            "CABAC + dia + p16x16",
            "cabac=1:me=dia:subme=4:partitions=p16x16,none",
        ),
        // Motion estimation
        Variant::new(
            "me",
            "CABAC + diamond + p16x16",
            "cabac=1:me=dia:subme=4:partitions=p16x16,none",
        ),
        Variant::new("me", "CABAC + hex + p16x16", "cabac=1:me=hex:subme=6:partitions=p16x16,none"),
        Variant::new("me", "CABAC + umh + p16x16", "cabac=1:me=umh:subme=7:partitions=p16x16,none"),
        Variant::new("me", "CABAC + esa + p16x16", "cabac=1:me=esa:subme=7:partitions=p16x16,none"),
        // Macroblock partitioning
        Variant::new(
            "part",
            "CABAC + dia + p16x16",
            "cabac=1:me=dia:subme=4:partitions=p16x16,none",
        ),
        Variant::new(
            "part",
            "CABAC + dia + p8x8,b8x8,i8x8",
            "cabac=1:me=dia:subme=7:partitions=p8x8,b8x8,i8x8",
        ),
        Variant::new(
            "part",
            "CABAC + dia + p4x4,b4x4,i4x4",
            "cabac=1:me=dia:subme=7:partitions=p4x4,b4x4,i4x4",
        ),
    ]
}

/// Baseline variant name per group.
pub fn default_baselines() -> BaselineMap {
    BaselineMap::new()
        .with("entropy", "CAVLC + dia + p16x16")
        .with("me", "CABAC + diamond + p16x16")
        .with("part", "CABAC + dia + p16x16")
}
