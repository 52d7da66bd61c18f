//! Error kinds for every stage of the question pipeline.
//!
//! Startup failures (`DataError::DataFileNotFound`, `ConfigError`) end the
//! invoked command with a diagnostic. Analysis and pipeline failures are
//! converted into data or user-facing text and never end a session.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading the dataset file.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file not found: {}", .0.display())]
    DataFileNotFound(PathBuf),

    #[error("Failed to read CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },
}

/// Failures inside a single aggregation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Column '{0}' is missing from the dataset")]
    MissingColumn(String),

    #[error("Column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Failed to read column '{column}': {message}")]
    ColumnRead { column: String, message: String },

    #[error("Division by zero: {0}")]
    DivisionByZero(&'static str),
}

/// Invalid or incomplete configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set. Pass --api-key or export OPENAI_API_KEY")]
    MissingApiKey,

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures talking to the language model.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Cannot connect to the model API at {0}")]
    Connect(String),

    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode model response: {0}")]
    Decode(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Failures during one question/answer cycle.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("classification failed: {0}")]
    Classification(#[source] LlmError),

    #[error("interpretation failed: {0}")]
    Interpretation(#[source] LlmError),

    #[error("failed to serialize analysis results: {0}")]
    Serialization(#[from] serde_json::Error),
}
