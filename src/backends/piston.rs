// src/backends/piston.rs

use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::backends::{ExecutionBackend, RunOutcome};
use crate::config::PistonConfig;
use crate::errors::{ExecError, Result};
use crate::languages::LanguageDescriptor;

/// A client for the synchronous Piston API. Piston reports no timings, so the
/// round trip is measured locally.
pub struct PistonClient {
    client: Client,
    config: PistonConfig,
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<SourceFile<'a>>,
    stdin: &'a str,
    args: Vec<String>,
    compile_timeout: u64,
    run_timeout: u64,
}

#[derive(Serialize)]
struct SourceFile<'a> {
    name: String,
    content: &'a str,
}

#[derive(Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    run: StageOutput,
    #[serde(default)]
    compile: Option<StageOutput>,
}

#[derive(Deserialize, Default)]
struct StageOutput {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    /// stdout and stderr interleaved.
    #[serde(default)]
    output: String,
    code: Option<i32>,
    signal: Option<String>,
    /// Newer Piston releases set "TO" on a timeout.
    status: Option<String>,
}

impl StageOutput {
    fn failed(&self) -> bool {
        self.code.is_some_and(|code| code != 0) || self.signal.is_some()
    }

    fn timed_out(&self) -> bool {
        self.signal.as_deref() == Some("SIGKILL") || self.status.as_deref() == Some("TO")
    }

    /// Stands in for stderr when a crashed process printed nothing.
    fn exit_summary(&self) -> Option<String> {
        if let Some(signal) = &self.signal {
            return Some(format!("Process terminated by signal {}", signal));
        }
        self.code
            .filter(|code| *code != 0)
            .map(|code| format!("Process exited with code {}", code))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn outcome_from_response(response: ExecuteResponse, elapsed_secs: f64) -> RunOutcome {
    let compile_failed = response.compile.as_ref().is_some_and(StageOutput::failed);
    let compile_output = match response.compile {
        Some(compile) if compile_failed => {
            if compile.stderr.trim().is_empty() {
                compile.output
            } else {
                compile.stderr
            }
        }
        _ => String::new(),
    };

    let timed_out = response.run.timed_out();
    let exit_summary = response.run.exit_summary();
    let mut stderr = response.run.stderr;
    if stderr.trim().is_empty() && !timed_out && !compile_failed {
        if let Some(summary) = exit_summary {
            stderr = summary;
        }
    }

    RunOutcome {
        timed_out,
        stdout: response.run.stdout,
        stderr,
        compile_output,
        execution_time: Some(elapsed_secs),
        memory_kb: None,
        compile_failed,
    }
}

impl PistonClient {
    /// Creates a new `PistonClient`.
    pub fn new(client: Client, config: PistonConfig) -> Self {
        Self { client, config }
    }
}

impl ExecutionBackend for PistonClient {
    fn ensure_configured(&self) -> Result<()> {
        Ok(())
    }

    async fn run(
        &self,
        source_code: &str,
        language: &LanguageDescriptor,
        stdin: &str,
    ) -> Result<RunOutcome> {
        let url = format!("{}/execute", self.config.api_base.trim_end_matches('/'));

        let body = ExecuteRequest {
            language: language.piston_runtime,
            version: language.piston_version,
            files: vec![SourceFile {
                name: language.source_file_name(),
                content: source_code,
            }],
            stdin,
            args: Vec::new(),
            compile_timeout: self.config.compile_timeout_ms,
            run_timeout: self.config.run_timeout_ms,
        };

        let start = Instant::now();

        let resp = self.client.post(&url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            if let Ok(error) = serde_json::from_str::<ErrorBody>(&error_body) {
                return Err(ExecError::Backend(error.message));
            }
            return Err(ExecError::ApiError {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let piston_resp: ExecuteResponse = resp.json().await?;
        let elapsed = start.elapsed().as_secs_f64();

        debug!(
            "Piston ran {} {} in {:.3}s",
            language.piston_runtime, language.piston_version, elapsed
        );

        Ok(outcome_from_response(piston_resp, elapsed))
    }
}
