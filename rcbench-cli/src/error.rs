// ============================================================================
// rcbench-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses rcbench-core's error type so that every failure, whether it
// comes from argument resolution or from the measurement engine, is reported
// the same way by `main`.
//
// KEY COMPONENTS:
// - CliResult: Type alias for CLI operations
// - CliErrorContext: adds a human-readable prefix to an error

use rcbench_core::{CoreError, CoreResult};
use std::fmt;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Extension trait for adding context to errors in the CLI.
pub trait CliErrorContext<T> {
    /// Add context using a closure (for lazy evaluation).
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {}", f(), core_error))
        })
    }
}

/// One-line suggestion shown under an error, where one applies.
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::DependencyNotFound(_) => Some(
            "Install ffmpeg/ffprobe and GNU time, or point RCBENCH_FFMPEG, RCBENCH_FFPROBE \
             and RCBENCH_TIME at them",
        ),
        CoreError::Config(_) => Some("Check the configuration file and command-line flags"),
        CoreError::PathError(_) => Some("Check that the path exists and is readable"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_with_context_prefixes_message() {
        let result: Result<(), CoreError> =
            Err(CoreError::Config("repeats must be at least 1".into()));
        let err = result.cli_with_context(|| "Loading bench.toml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Operation failed: Loading bench.toml: Invalid configuration: repeats must be at least 1"
        );
    }

    #[test]
    fn test_suggestions() {
        assert!(suggestion_for(&CoreError::DependencyNotFound("ffmpeg".into())).is_some());
        assert!(suggestion_for(&CoreError::Probe("bad".into())).is_none());
    }
}
