// src/backends/mod.rs

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::BackendConfig;
use crate::errors::Result;
use crate::languages::LanguageDescriptor;

pub mod judge0;
pub mod piston;

pub use judge0::Judge0Client;
pub use piston::PistonClient;

/// Raw output of one program run, before any comparison against expectations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    pub stdout: String,
    pub stderr: String,
    /// Compile-stage diagnostics, when the backend separates them from stderr.
    pub compile_output: String,
    /// Seconds.
    pub execution_time: Option<f64>,
    pub memory_kb: Option<u64>,
    /// The backend itself reported a failed compile stage.
    pub compile_failed: bool,
    pub timed_out: bool,
}

/// A common trait for remote code-execution backends.
///
/// Implementations submit one (source, stdin) pair and return captured output.
/// Note: `run` is a native async fn in a trait, so backends are used through
/// generics or the `ExecutionClient` enum rather than `dyn`.
pub trait ExecutionBackend: Send + Sync {
    /// Fails with `MissingCredentials` when the backend cannot be called at all.
    /// Never touches the network.
    fn ensure_configured(&self) -> Result<()>;

    /// Runs `source_code` once with `stdin` and returns the captured output.
    fn run(
        &self,
        source_code: &str,
        language: &LanguageDescriptor,
        stdin: &str,
    ) -> impl std::future::Future<Output = Result<RunOutcome>> + Send;
}

/// Waits between status polls. Swapped out in tests so polling runs instantly.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// The execution client, selected once from configuration.
pub enum ExecutionClient {
    /// Submit, then poll for a terminal state (Judge0).
    Polling(Judge0Client),
    /// Single request/response round trip (Piston).
    Synchronous(PistonClient),
}

impl ExecutionClient {
    pub fn from_config(client: Client, backend: &BackendConfig) -> Self {
        match backend {
            BackendConfig::Judge0(config) => {
                ExecutionClient::Polling(Judge0Client::new(client, config.clone()))
            }
            BackendConfig::Piston(config) => {
                ExecutionClient::Synchronous(PistonClient::new(client, config.clone()))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            ExecutionClient::Polling(_) => "judge0",
            ExecutionClient::Synchronous(_) => "piston",
        }
    }
}

impl ExecutionBackend for ExecutionClient {
    fn ensure_configured(&self) -> Result<()> {
        match self {
            ExecutionClient::Polling(client) => client.ensure_configured(),
            ExecutionClient::Synchronous(client) => client.ensure_configured(),
        }
    }

    async fn run(
        &self,
        source_code: &str,
        language: &LanguageDescriptor,
        stdin: &str,
    ) -> Result<RunOutcome> {
        match self {
            ExecutionClient::Polling(client) => client.run(source_code, language, stdin).await,
            ExecutionClient::Synchronous(client) => client.run(source_code, language, stdin).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Judge0Config, PistonConfig, PollPolicy, ResourceLimits};

    #[test]
    fn test_client_follows_backend_config() {
        let judge0 = BackendConfig::Judge0(Judge0Config {
            api_base: "http://localhost:2358".to_string(),
            api_key: None,
            rapidapi_host: None,
            limits: ResourceLimits::default(),
            poll: PollPolicy::default(),
        });
        let client = ExecutionClient::from_config(Client::new(), &judge0);
        assert_eq!(client.backend_name(), "judge0");
        assert!(client.ensure_configured().is_ok());

        let piston = BackendConfig::Piston(PistonConfig::default());
        let client = ExecutionClient::from_config(Client::new(), &piston);
        assert_eq!(client.backend_name(), "piston");
        assert!(client.ensure_configured().is_ok());
    }
}
