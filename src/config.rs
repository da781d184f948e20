// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{ExecError, Result};
use crate::settings::{self, Settings};

/// Value shipped in sample env files; treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "your-rapidapi-key-here";

pub const DEFAULT_JUDGE0_API_BASE: &str = "https://judge0-ce.p.rapidapi.com";
pub const DEFAULT_RAPIDAPI_HOST: &str = "judge0-ce.p.rapidapi.com";
pub const DEFAULT_PISTON_API_BASE: &str = "https://emkc.org/api/v2/piston";

/// Sandbox limits sent with every Judge0 submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceLimits {
    /// Seconds of CPU time.
    pub cpu_time_limit: f64,
    /// Seconds of wall-clock time.
    pub wall_time_limit: f64,
    /// Kilobytes.
    pub memory_limit_kb: u32,
    pub max_processes_and_or_threads: u32,
    /// Kilobytes a program may write.
    pub max_file_size_kb: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            cpu_time_limit: 2.0,
            wall_time_limit: 5.0,
            memory_limit_kb: 128_000,
            max_processes_and_or_threads: 60,
            max_file_size_kb: 1024,
        }
    }
}

/// How long to wait for a Judge0 job to reach a terminal state.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 30,
        }
    }
}

/// Configuration for the poll-based Judge0 backend.
#[derive(Debug, Clone)]
pub struct Judge0Config {
    pub api_base: String,
    pub api_key: Option<String>,
    /// `Some` when the instance sits behind RapidAPI and needs a key.
    pub rapidapi_host: Option<String>,
    pub limits: ResourceLimits,
    pub poll: PollPolicy,
}

impl Judge0Config {
    pub fn requires_credentials(&self) -> bool {
        self.rapidapi_host.is_some()
    }

    /// The configured key, ignoring empty and placeholder values.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !is_placeholder_key(key))
    }
}

/// Configuration for the synchronous Piston backend.
#[derive(Debug, Clone)]
pub struct PistonConfig {
    pub api_base: String,
    pub compile_timeout_ms: u64,
    pub run_timeout_ms: u64,
}

impl Default for PistonConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_PISTON_API_BASE.to_string(),
            compile_timeout_ms: 10_000,
            run_timeout_ms: 3_000,
        }
    }
}

/// Which backend protocol the execution client speaks.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    Judge0(Judge0Config),
    Piston(PistonConfig),
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::Judge0(_) => "judge0",
            BackendConfig::Piston(_) => "piston",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// High-level application configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub server: ServerConfig,
    pub settings_path: PathBuf,
}

/// True for keys that should count as "not configured".
pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || key == PLACEHOLDER_API_KEY
}

impl AppConfig {
    /// Load configuration from environment variables and the persisted settings file.
    pub fn from_env() -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        let settings_path = match lookup("CODEJUDGE_SETTINGS") {
            Some(path) => PathBuf::from(path),
            None => settings::default_path()?,
        };
        let settings = Settings::load(&settings_path)?;
        Self::from_lookup(lookup, &settings, settings_path)
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// A key saved in the settings file wins over `RAPIDAPI_KEY`.
    pub fn from_lookup<F>(lookup: F, settings: &Settings, settings_path: PathBuf) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_name = lookup("EXECUTION_BACKEND").unwrap_or_else(|| "judge0".to_string());

        let backend = match backend_name.trim().to_lowercase().as_str() {
            "judge0" => {
                let api_key = settings
                    .rapidapi_key
                    .clone()
                    .filter(|key| !is_placeholder_key(key))
                    .or_else(|| lookup("RAPIDAPI_KEY"));
                let rapidapi_host = match lookup("JUDGE0_RAPIDAPI_HOST") {
                    Some(host) if host.trim().is_empty() => None,
                    Some(host) => Some(host),
                    None => Some(DEFAULT_RAPIDAPI_HOST.to_string()),
                };
                BackendConfig::Judge0(Judge0Config {
                    api_base: lookup("JUDGE0_API_BASE")
                        .unwrap_or_else(|| DEFAULT_JUDGE0_API_BASE.to_string()),
                    api_key,
                    rapidapi_host,
                    limits: ResourceLimits::default(),
                    poll: PollPolicy::default(),
                })
            }
            "piston" => BackendConfig::Piston(PistonConfig {
                api_base: lookup("PISTON_API_BASE")
                    .unwrap_or_else(|| DEFAULT_PISTON_API_BASE.to_string()),
                ..PistonConfig::default()
            }),
            other => {
                return Err(ExecError::Config(format!(
                    "Unknown EXECUTION_BACKEND '{}'. Expected 'judge0' or 'piston'.",
                    other
                )));
            }
        };

        let port = match lookup("SERVER_PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| ExecError::Config(format!("Invalid SERVER_PORT '{}'", port)))?,
            None => 8080,
        };

        Ok(AppConfig {
            backend,
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
            },
            settings_path,
        })
    }
}
