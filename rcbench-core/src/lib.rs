//! Core library for measuring the relative computational cost of encoder
//! configurations.
//!
//! A measurement pass runs every configured variant several times against
//! each clip through `time -v`, median-reduces the reported figures,
//! normalizes them per frame and per megapixel, and appends one row per
//! (clip, variant) to a raw CSV store. A separate reduction pass turns the
//! raw store into a summary that expresses each variant's cost relative to
//! its group's baseline.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use rcbench_core::config::{BenchConfigBuilder, ClipSpec};
//! use rcbench_core::external::SystemProcessRunner;
//! use rcbench_core::{reduce_file, run_benchmark};
//!
//! let config = BenchConfigBuilder::new()
//!     .clip(ClipSpec::new("T1", "traffic_720p30.mp4"))
//!     .build()
//!     .unwrap();
//!
//! let report = run_benchmark(&SystemProcessRunner, &config).unwrap();
//! println!("{} rows measured", report.rows_written);
//!
//! reduce_file(&config.raw_csv, &config.summary_csv, &config.baselines).unwrap();
//! ```

pub mod aggregate;
pub mod bench;
pub mod config;
pub mod error;
pub mod external;
pub mod logging;
pub mod media;
pub mod metrics;
pub mod reduce;
pub mod report;
pub mod runner;
pub mod stats;
pub mod store;
pub mod terminal;
pub mod utils;

// Re-exports for public API
pub use aggregate::{AggregatedMeasurement, RawMeasurement, aggregate};
pub use bench::{BenchReport, check_dependencies, run_benchmark};
pub use config::{BaselineMap, BenchConfig, BenchConfigBuilder, ClipSpec, Variant};
pub use error::{CoreError, CoreResult};
pub use external::{ProcessOutput, ProcessRunner, SystemProcessRunner};
pub use media::{ClipInfo, ClipProber};
pub use metrics::DerivedMetrics;
pub use reduce::{ReduceStats, SummaryRow, reduce_file, reduce_records};
pub use report::ResourceUsage;
pub use runner::{OutputSink, VariantRunner};
pub use stats::median;
pub use store::{AggregatedRow, RawRecord, RawStoreWriter, read_raw};
pub use utils::format_duration;
