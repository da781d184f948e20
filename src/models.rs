// src/models.rs
use serde::{Deserialize, Serialize};

/// One input/expected-output pair owned by a challenge definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Fed to the program on stdin.
    pub input: String,
    pub expected_output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
            description: None,
        }
    }
}

/// Result of running a submission against a single test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub input: String,
    /// Trimmed.
    pub expected_output: String,
    /// Trimmed.
    pub actual_output: String,
    pub passed: bool,
    /// Seconds, as reported by the backend or measured locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_kb: Option<u64>,
    #[serde(default)]
    pub timed_out: bool,
    /// Compile diagnostics or stderr, trimmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    Error,
    /// Reserved for presentation compatibility; the aggregator reports
    /// time-limit hits as runtime errors.
    Timeout,
    CompilationError,
    RuntimeError,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ExecutionStatus::Success => "success",
            ExecutionStatus::Error => "error",
            ExecutionStatus::Timeout => "timeout",
            ExecutionStatus::CompilationError => "compilation_error",
            ExecutionStatus::RuntimeError => "runtime_error",
        };
        write!(f, "{}", label)
    }
}

/// Aggregate verdict for one submission.
///
/// `test_results` holds one entry per attempted case and is shorter than
/// `total_test_cases` when a compilation failure stopped the run early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub test_cases_passed: usize,
    pub total_test_cases: usize,
    pub test_results: Vec<TestCaseResult>,
    /// Sum of the attempted cases' execution times, in seconds.
    pub execution_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compilation_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ExecutionResult {
    /// Whether the submission should be accepted: every requested case ran and passed.
    pub fn all_passed(&self) -> bool {
        self.total_test_cases > 0 && self.test_cases_passed == self.total_test_cases
    }
}
