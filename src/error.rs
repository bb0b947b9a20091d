//! Error types for LLM mutant generation

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating mutants
#[derive(Debug, Error)]
pub enum MutatorError {
    /// Failed to read or write a file
    #[error("I/O error on '{}': {error}", file.display())]
    Io { file: PathBuf, error: String },

    /// Source couldn't be parsed as valid Java
    #[error("Failed to parse Java source: {reason}")]
    Parse { reason: String },

    /// Output directory couldn't be cleared or created
    #[error("Failed to prepare output directory '{}': {error}", dir.display())]
    OutputDirectory { dir: PathBuf, error: String },

    /// Operator report couldn't be written
    #[error("Failed to write report '{}': {error}", file.display())]
    Report { file: PathBuf, error: String },

    /// Transport-level failure talking to the model endpoint
    #[error("HTTP request failed: {error}")]
    Http { error: String },

    /// Endpoint answered with something other than a chat completion
    #[error("Invalid model response: {reason}")]
    InvalidResponse { reason: String },

    /// API key environment variable missing or blank
    #[error("API Key not found in Environment Variables ({var})")]
    MissingApiKey { var: String },

    /// Requested model has no configured endpoint
    #[error("Unsupported LLM model '{model}'\n  Available models: {}", available.join(", "))]
    UnsupportedModel { model: String, available: Vec<String> },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Source discovery failed
    #[error("{message}")]
    Discovery { message: String },
}

impl MutatorError {
    pub(crate) fn io(file: impl Into<PathBuf>, error: impl ToString) -> Self {
        MutatorError::Io {
            file: file.into(),
            error: error.to_string(),
        }
    }
}

/// Result type for mutator operations
pub type Result<T> = std::result::Result<T, MutatorError>;
