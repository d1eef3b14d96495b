// ============================================================================
// rcbench-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Process Invocation Abstraction
//
// This module encapsulates every interaction with external command-line tools
// (ffprobe, ffmpeg and the `time` resource accounting wrapper). Callers hand
// over a program name and a structured argument list and get back the
// captured text plus the exit status. Nothing in here interprets tool output.
//
// KEY COMPONENTS:
// - ProcessRunner: Trait for running one external process to completion
// - ProcessOutput: Captured stdout/stderr and exit code
// - SystemProcessRunner: Concrete implementation using std::process::Command
// - Dependency checking
//
// DESIGN PHILOSOPHY:
// This module follows the dependency injection pattern, so the prober, the
// variant runner and the orchestrator can be driven by scripted responses in
// tests without spawning real processes.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult, command_start_error};

// ---- Standard library imports ----
use std::ffi::OsString;
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Scripted ProcessRunner used by tests
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

#[cfg(any(test, feature = "test-mocks"))]
pub use mocks::MockProcessRunner;

// ============================================================================
// PROCESS OUTPUT
// ============================================================================

/// Captured result of a completed external process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    /// Everything the process wrote to standard output
    pub stdout: String,
    /// Everything the process wrote to standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Creates a successful output with the given stdout text.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Returns true if the process exited with status zero.
    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }

    /// Standard output followed by standard error, as one report text.
    ///
    /// `time -v` writes its statistics to stderr after the wrapped program
    /// has finished, so appending stderr keeps the statistics block intact.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        text.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stdout.ends_with('\n') && !self.stderr.is_empty() {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        text
    }
}

// ============================================================================
// PROCESS RUNNER
// ============================================================================

/// Something that can run an external program to completion.
///
/// Implementations block until the process exits. A process that starts but
/// exits non-zero is still `Ok`; only a failure to start is an error.
pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[OsString]) -> CoreResult<ProcessOutput>;
}

/// Runs processes with `std::process::Command`, capturing both pipes.
#[derive(Debug, Clone, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, program: &str, args: &[OsString]) -> CoreResult<ProcessOutput> {
        log::debug!("Running: {} {}", program, format_args_for_log(args));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    CoreError::DependencyNotFound(program.to_string())
                } else {
                    command_start_error(program, e)
                }
            })?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Renders an argument list the way a shell user would read it.
pub fn format_args_for_log(args: &[OsString]) -> String {
    args.iter()
        .map(|a| {
            let s = a.to_string_lossy();
            if s.is_empty() || s.contains(char::is_whitespace) {
                format!("\"{s}\"")
            } else {
                s.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external command is available and executable.
///
/// The command is run once with `version_arg`; its exit status is ignored,
/// since some tools (GNU time among them) exit non-zero for informational
/// flags. Only a failure to start the program counts as missing.
pub fn check_dependency<R: ProcessRunner>(
    runner: &R,
    cmd_name: &str,
    version_arg: &str,
) -> CoreResult<()> {
    match runner.run(cmd_name, &[OsString::from(version_arg)]) {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(CoreError::DependencyNotFound(name)) => {
            log::warn!("Dependency '{}' not found.", name);
            Err(CoreError::DependencyNotFound(name))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(e)
        }
    }
}
