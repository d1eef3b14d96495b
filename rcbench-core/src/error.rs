// ============================================================================
// rcbench-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for rcbench-core
//
// This module defines the error type used across the library. Low-level
// parse and aggregation problems never surface here: they degrade to missing
// values. Errors are reserved for things that stop a unit of work, such as a
// clip whose geometry cannot be probed or a store that cannot be written.
//
// KEY COMPONENTS:
// - CoreError: Enum of all error variants
// - CoreResult: Result alias
// - Helper constructors for external command failures

use std::io;
use thiserror::Error;

/// Errors produced by rcbench-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Command '{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Required external command not found: {0}")]
    DependencyNotFound(String),

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for rcbench-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for a command that could not be spawned.
pub fn command_start_error(command: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), err)
}

/// Builds a [`CoreError::CommandFailed`] from an exit code and captured stderr.
///
/// `code` is `None` when the process was terminated by a signal.
pub fn command_failed_error(
    command: impl Into<String>,
    code: Option<i32>,
    stderr: impl Into<String>,
) -> CoreError {
    let status = match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    };
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_error_message() {
        let err = command_failed_error("ffprobe", Some(1), "No such file");
        assert_eq!(
            err.to_string(),
            "Command 'ffprobe' exited with exit code 1: No such file"
        );

        let err = command_failed_error("ffmpeg", None, "");
        assert!(err.to_string().contains("termination by signal"));
    }
}
