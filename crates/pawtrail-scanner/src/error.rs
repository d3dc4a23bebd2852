//! Error types for the Scanner

use thiserror::Error;

/// Errors that can occur while scanning
#[derive(Error, Debug)]
pub enum ScannerError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model answered with nothing
    #[error("Empty model response")]
    EmptyResponse,

    /// Model answer does not have the expected shape
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// File system error
    #[error("I/O error ({context}): {source}")]
    Io {
        /// What was being done
        context: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Processing state could not be persisted
    #[error("State error: {0}")]
    State(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScannerError {
    /// Wrap an I/O error with a short description of the failed operation
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ScannerError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for ScannerError {
    fn from(e: serde_json::Error) -> Self {
        ScannerError::JsonParse(e.to_string())
    }
}
