// rcbench-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

use super::{ProcessOutput, ProcessRunner};
use crate::error::{CoreError, CoreResult, command_start_error};
use std::cell::RefCell;
use std::ffi::OsString;
use std::io;
use std::rc::Rc;

enum MockResult {
    Output(ProcessOutput),
    NotFound,
    StartError(String),
}

/// Represents an expected process invocation and its scripted result.
struct MockExpectation {
    program: String,
    arg_pattern: Option<String>,
    result: MockResult,
}

/// Mock implementation of ProcessRunner supporting multiple expectations.
///
/// Expectations are consumed in insertion order: the first unconsumed one
/// whose program matches (and whose argument pattern, if any, is contained in
/// one of the arguments) answers the call. An unmatched call panics.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    expectations: Rc<RefCell<Vec<MockExpectation>>>,
    received_calls: Rc<RefCell<Vec<(String, Vec<String>)>>>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Default::default()
    }

    fn push(&self, program: &str, arg_pattern: Option<&str>, result: MockResult) {
        self.expectations.borrow_mut().push(MockExpectation {
            program: program.to_string(),
            arg_pattern: arg_pattern.map(str::to_string),
            result,
        });
    }

    /// Answers the next call to `program` with `output`.
    pub fn expect(&self, program: &str, output: ProcessOutput) {
        self.push(program, None, MockResult::Output(output));
    }

    /// Answers the next call to `program` having an argument containing `pattern`.
    pub fn expect_with_args(&self, program: &str, pattern: &str, output: ProcessOutput) {
        self.push(program, Some(pattern), MockResult::Output(output));
    }

    /// Simulates `program` missing from PATH.
    pub fn expect_not_found(&self, program: &str) {
        self.push(program, None, MockResult::NotFound);
    }

    /// Simulates a spawn failure for the next matching call.
    pub fn expect_start_error(&self, program: &str, pattern: Option<&str>, message: &str) {
        self.push(program, pattern, MockResult::StartError(message.to_string()));
    }

    pub fn get_received_calls(&self) -> Vec<(String, Vec<String>)> {
        self.received_calls.borrow().clone()
    }

    pub fn remaining_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }
}

impl ProcessRunner for MockProcessRunner {
    fn run(&self, program: &str, args: &[OsString]) -> CoreResult<ProcessOutput> {
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        self.received_calls
            .borrow_mut()
            .push((program.to_string(), args.clone()));

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations.iter().position(|exp| {
            exp.program == program
                && exp
                    .arg_pattern
                    .as_ref()
                    .is_none_or(|pattern| args.iter().any(|arg| arg.contains(pattern)))
        });

        let Some(index) = found_index else {
            log::error!("MockProcessRunner: No expectation found for {} {:?}", program, args);
            panic!("MockProcessRunner: No expectation found for {program} {args:?}");
        };

        match expectations.remove(index).result {
            MockResult::Output(output) => Ok(output),
            MockResult::NotFound => Err(CoreError::DependencyNotFound(program.to_string())),
            MockResult::StartError(message) => Err(command_start_error(
                program,
                io::Error::other(message),
            )),
        }
    }
}
