//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

use rcbench_core::config::BenchConfig;
use std::path::Path;

use crate::error::{CliErrorContext, CliResult};

pub mod probe;
pub mod reduce;
pub mod run;
pub mod variants;

/// Loads the configuration file if given (built-in defaults otherwise) and
/// applies `RCBENCH_*` environment overrides.
pub fn load_config(path: Option<&Path>) -> CliResult<BenchConfig> {
    let config = match path {
        Some(path) => BenchConfig::load_from_file(path)
            .cli_with_context(|| format!("Loading {}", path.display()))?,
        None => BenchConfig::default(),
    };
    Ok(config.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_without_file_uses_builtins() {
        let config = load_config(None).unwrap();
        assert_eq!(config.variants.len(), 9);
        assert!(config.clips.is_empty());
    }

    #[test]
    fn test_load_config_missing_file_fails() {
        let err = load_config(Some(Path::new("/nonexistent/bench.toml"))).unwrap_err();
        assert!(err.to_string().contains("Loading /nonexistent/bench.toml"));
    }
}
