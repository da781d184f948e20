// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Failed to submit code for execution: {0}")]
    SubmissionFailed(String),

    #[error("Execution timeout - submission did not finish after {attempts} status checks")]
    PollTimeout { attempts: u32 },

    #[error("Execution backend error: {0}")]
    Backend(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Failed to decode backend output: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML settings: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to write TOML settings: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key looks invalid: it must be longer than {min_len} characters")]
    InvalidApiKey { min_len: usize },
}

impl ExecError {
    /// True for the failures that are raised before any network call is made.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ExecError::UnsupportedLanguage(_) | ExecError::MissingCredentials(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ExecError>;
