//! CSV stores shared by the measurement pass and the reducer.
//!
//! The raw store is the only hand-off between the two passes. It is written
//! append-only, one row per (clip, variant), and read back as string
//! records so the reducer can copy columns through untouched.

pub mod raw;

pub use raw::{AggregatedRow, RAW_COLUMNS, RawRecord, RawStoreWriter, read_raw};
