// src/backends/judge0.rs

use base64::{Engine as _, engine::general_purpose};
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::backends::{ExecutionBackend, RunOutcome, Sleeper, TokioSleeper};
use crate::config::Judge0Config;
use crate::errors::{ExecError, Result};
use crate::languages::LanguageDescriptor;

// Judge0 status ids. 1 = In Queue, 2 = Processing; anything above is terminal.
const STATUS_PROCESSING: u32 = 2;
const STATUS_TIME_LIMIT_EXCEEDED: u32 = 5;
const STATUS_COMPILATION_ERROR: u32 = 6;
// 7..=12 are the runtime failures (SIGSEGV, SIGXFSZ, SIGFPE, SIGABRT, NZEC, Other).
const STATUS_RUNTIME_ERRORS: std::ops::RangeInclusive<u32> = 7..=12;
const STATUS_INTERNAL_ERROR: u32 = 13;
const STATUS_EXEC_FORMAT_ERROR: u32 = 14;

/// A client for the poll-based Judge0 API.
pub struct Judge0Client {
    client: Client,
    config: Judge0Config,
    sleeper: Arc<dyn Sleeper>,
}

#[derive(Serialize)]
struct SubmissionRequest {
    source_code: String,
    language_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdin: Option<String>,
    cpu_time_limit: f64,
    memory_limit: u32,
    wall_time_limit: f64,
    max_processes_and_or_threads: u32,
    enable_per_process_and_thread_time_limit: bool,
    enable_per_process_and_thread_memory_limit: bool,
    max_file_size: u32,
}

#[derive(Deserialize)]
struct SubmissionToken {
    token: String,
}

#[derive(Debug, Deserialize)]
struct SubmissionStatus {
    status: StatusInfo,
    stdout: Option<String>,
    stderr: Option<String>,
    compile_output: Option<String>,
    message: Option<String>,
    time: Option<String>,
    memory: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct StatusInfo {
    id: u32,
    description: String,
}

fn encode(text: &str) -> String {
    general_purpose::STANDARD.encode(text)
}

/// Decodes an optional base64 field. Judge0 wraps long payloads with newlines.
fn decode(field: Option<&str>) -> Result<String> {
    let Some(encoded) = field else {
        return Ok(String::new());
    };
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = general_purpose::STANDARD.decode(compact)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn outcome_from_status(status: SubmissionStatus) -> Result<RunOutcome> {
    let stdout = decode(status.stdout.as_deref())?;
    let mut stderr = decode(status.stderr.as_deref())?;
    let message = decode(status.message.as_deref())?;

    let id = status.status.id;
    let compile_failed = id == STATUS_COMPILATION_ERROR;
    // Warnings from a successful compile are not diagnostics.
    let compile_output = if compile_failed {
        decode(status.compile_output.as_deref())?
    } else {
        String::new()
    };

    let silent_failure = STATUS_RUNTIME_ERRORS.contains(&id)
        || matches!(id, STATUS_INTERNAL_ERROR | STATUS_EXEC_FORMAT_ERROR);
    if stderr.trim().is_empty() && silent_failure {
        stderr = if message.trim().is_empty() {
            status.status.description.clone()
        } else {
            message
        };
    }

    Ok(RunOutcome {
        stdout,
        stderr,
        compile_output,
        execution_time: status.time.as_deref().and_then(|t| t.trim().parse::<f64>().ok()),
        memory_kb: status.memory,
        compile_failed,
        timed_out: id == STATUS_TIME_LIMIT_EXCEEDED,
    })
}

impl Judge0Client {
    /// Creates a new `Judge0Client` that waits between polls with tokio's timer.
    pub fn new(client: Client, config: Judge0Config) -> Self {
        Self::with_sleeper(client, config, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(client: Client, config: Judge0Config, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            client,
            config,
            sleeper,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Adds RapidAPI headers when the instance is behind RapidAPI.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match (&self.config.rapidapi_host, self.config.credential()) {
            (Some(host), Some(key)) => request
                .header("X-RapidAPI-Key", key)
                .header("X-RapidAPI-Host", host),
            _ => request,
        }
    }

    async fn submit(&self, source_code: &str, language_id: u32, stdin: &str) -> Result<String> {
        let limits = &self.config.limits;
        let body = SubmissionRequest {
            source_code: encode(source_code),
            language_id,
            stdin: (!stdin.is_empty()).then(|| encode(stdin)),
            cpu_time_limit: limits.cpu_time_limit,
            memory_limit: limits.memory_limit_kb,
            wall_time_limit: limits.wall_time_limit,
            max_processes_and_or_threads: limits.max_processes_and_or_threads,
            enable_per_process_and_thread_time_limit: false,
            enable_per_process_and_thread_memory_limit: false,
            max_file_size: limits.max_file_size_kb,
        };

        let resp = self
            .authorize(self.client.post(self.url("/submissions")))
            .query(&[("base64_encoded", "true"), ("wait", "false")])
            .json(&body)
            .send()
            .await
            .map_err(|e| ExecError::SubmissionFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(ExecError::SubmissionFailed(format!(
                "status {}: {}",
                status.as_u16(),
                error_body
            )));
        }

        let token: SubmissionToken = resp
            .json()
            .await
            .map_err(|e| ExecError::SubmissionFailed(e.to_string()))?;
        Ok(token.token)
    }

    async fn fetch(&self, token: &str) -> Result<SubmissionStatus> {
        let resp = self
            .authorize(self.client.get(self.url(&format!("/submissions/{}", token))))
            .query(&[("base64_encoded", "true")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(ExecError::ApiError {
                status: status.as_u16(),
                body: error_body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Polls until the job leaves the queue, or gives up after the attempt budget.
    async fn wait_for_completion(&self, token: &str) -> Result<SubmissionStatus> {
        let poll = &self.config.poll;
        for attempt in 1..=poll.max_attempts {
            let status = self.fetch(token).await?;
            if status.status.id > STATUS_PROCESSING {
                debug!(
                    "Judge0 submission {} finished after {} poll(s): {}",
                    token, attempt, status.status.description
                );
                return Ok(status);
            }
            debug!(
                "Judge0 submission {} still {} (attempt {}/{})",
                token, status.status.description, attempt, poll.max_attempts
            );
            if attempt < poll.max_attempts {
                self.sleeper.sleep(poll.interval).await;
            }
        }

        warn!("Judge0 submission {} never reached a terminal state", token);
        Err(ExecError::PollTimeout {
            attempts: poll.max_attempts,
        })
    }
}

impl ExecutionBackend for Judge0Client {
    fn ensure_configured(&self) -> Result<()> {
        if self.config.requires_credentials() && self.config.credential().is_none() {
            return Err(ExecError::MissingCredentials(
                "RapidAPI key not configured. Set RAPIDAPI_KEY or save a key in the settings file."
                    .to_string(),
            ));
        }
        Ok(())
    }

    async fn run(
        &self,
        source_code: &str,
        language: &LanguageDescriptor,
        stdin: &str,
    ) -> Result<RunOutcome> {
        let token = self.submit(source_code, language.judge0_id, stdin).await?;
        debug!("Judge0 accepted {} submission {}", language.key, token);

        let status = self.wait_for_completion(&token).await?;
        outcome_from_status(status)
    }
}
