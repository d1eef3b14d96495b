// rcbench-cli/src/lib.rs
//
// Library portion of the rcbench CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ProbeArgs, ReduceArgs, RunArgs, VariantsArgs, parse_cli};
pub use commands::probe::run_probe;
pub use commands::reduce::run_reduce;
pub use commands::run::{resolve_run_config, run_bench};
pub use commands::variants::run_variants;
