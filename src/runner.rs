// src/runner.rs
use log::{debug, info, warn};

use crate::backends::{ExecutionBackend, RunOutcome};
use crate::errors::Result;
use crate::languages::{self, LanguageDescriptor};
use crate::models::{ExecutionResult, ExecutionStatus, TestCase, TestCaseResult};

/// Error text that marks a compilation failure.
///
/// Matched as case-insensitive substrings, so a runtime message that merely
/// mentions compiling (e.g. "Recompile with -Xlint") is also classified as a
/// compile failure. Backends only report compiler output when compilation
/// actually failed, which keeps warnings out of this check.
pub const COMPILE_ERROR_TOKENS: &[&str] = &["compilation", "syntax", "compile"];

pub const RUNTIME_ERROR_SUMMARY: &str = "Runtime error occurred during execution";
pub const TIME_LIMIT_MESSAGE: &str = "Time limit exceeded";
pub const COMPILE_FAILED_MESSAGE: &str = "Compilation failed";

/// How a single test case failed, if it did.
#[derive(Debug, Clone, PartialEq)]
enum Failure {
    Compilation(String),
    Runtime,
}

/// Whether `message` reads like compiler or parser output.
pub fn is_compile_error(message: &str) -> bool {
    let lowered = message.to_lowercase();
    COMPILE_ERROR_TOKENS.iter().any(|token| lowered.contains(token))
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Compile diagnostics first, then stderr, then a generic note for silent failures.
fn error_text(outcome: &RunOutcome) -> Option<String> {
    non_empty(&outcome.compile_output)
        .or_else(|| non_empty(&outcome.stderr))
        .or_else(|| outcome.compile_failed.then(|| COMPILE_FAILED_MESSAGE.to_string()))
        .or_else(|| outcome.timed_out.then(|| TIME_LIMIT_MESSAGE.to_string()))
}

/// Runs the submission against one test case. Backend failures become a failed result.
async fn run_test_case<B: ExecutionBackend>(
    backend: &B,
    source_code: &str,
    language: &LanguageDescriptor,
    test_case: &TestCase,
) -> (TestCaseResult, Option<Failure>) {
    let expected_output = test_case.expected_output.trim().to_string();

    match backend.run(source_code, language, &test_case.input).await {
        Ok(outcome) => {
            let actual_output = outcome.stdout.trim().to_string();
            let error_message = error_text(&outcome);
            let failure = error_message.as_ref().map(|message| {
                if outcome.compile_failed || is_compile_error(message) {
                    Failure::Compilation(message.clone())
                } else {
                    Failure::Runtime
                }
            });

            let result = TestCaseResult {
                input: test_case.input.clone(),
                passed: actual_output == expected_output,
                expected_output,
                actual_output,
                execution_time: outcome.execution_time,
                memory_kb: outcome.memory_kb,
                timed_out: outcome.timed_out,
                error_message,
            };
            (result, failure)
        }
        Err(e) => {
            warn!("Execution backend failed for {}: {}", language.key, e);
            let message = e.to_string();
            let failure = if is_compile_error(&message) {
                Failure::Compilation(message.clone())
            } else {
                Failure::Runtime
            };

            let result = TestCaseResult {
                input: test_case.input.clone(),
                expected_output,
                actual_output: String::new(),
                passed: false,
                execution_time: None,
                memory_kb: None,
                timed_out: false,
                error_message: Some(message),
            };
            (result, Some(failure))
        }
    }
}

/// Runs `source_code` against every test case in order and folds the verdict.
///
/// Fails before any network call for an unknown language or an unconfigured
/// backend. Once started, it always returns a complete `ExecutionResult`; a
/// compilation failure stops the run and the remaining cases are never sent.
pub async fn execute_code<B: ExecutionBackend>(
    backend: &B,
    source_code: &str,
    language: &str,
    test_cases: &[TestCase],
) -> Result<ExecutionResult> {
    let descriptor = languages::describe(language)?;
    backend.ensure_configured()?;

    info!(
        "Running {} submission against {} test case(s)",
        descriptor.key,
        test_cases.len()
    );

    let mut test_results = Vec::with_capacity(test_cases.len());
    let mut total_execution_time = 0.0;
    let mut compilation_error = None;
    let mut has_runtime_error = false;

    for (idx, test_case) in test_cases.iter().enumerate() {
        let (result, failure) = run_test_case(backend, source_code, descriptor, test_case).await;

        debug!(
            "Test {}/{} -> {}",
            idx + 1,
            test_cases.len(),
            if result.passed { "passed" } else { "failed" }
        );

        if let Some(time) = result.execution_time {
            total_execution_time += time;
        }
        test_results.push(result);

        match failure {
            Some(Failure::Compilation(message)) => {
                warn!(
                    "Compilation failed on test {}; skipping the remaining {}",
                    idx + 1,
                    test_cases.len() - idx - 1
                );
                compilation_error = Some(message);
                break;
            }
            Some(Failure::Runtime) => has_runtime_error = true,
            None => {}
        }
    }

    let test_cases_passed = test_results.iter().filter(|r| r.passed).count();

    let status = if compilation_error.is_some() {
        ExecutionStatus::CompilationError
    } else if has_runtime_error {
        ExecutionStatus::RuntimeError
    } else if test_cases_passed == 0 {
        ExecutionStatus::Error
    } else {
        ExecutionStatus::Success
    };

    info!(
        "Finished {} submission: {} ({}/{} passed, {:.3}s)",
        descriptor.key,
        status,
        test_cases_passed,
        test_cases.len(),
        total_execution_time
    );

    Ok(ExecutionResult {
        status,
        test_cases_passed,
        total_test_cases: test_cases.len(),
        test_results,
        execution_time: total_execution_time,
        compilation_error,
        error_message: has_runtime_error.then(|| RUNTIME_ERROR_SUMMARY.to_string()),
    })
}
