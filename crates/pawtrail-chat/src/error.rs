//! Error types for the chat library.

use thiserror::Error;

/// Chat operation errors
#[derive(Debug, Error)]
pub enum ChatError {
    /// Connection error (network, DNS, timeout, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The API answered with an error status
    #[error("API error: {0}")]
    Api(String),

    /// The API answered with something that is not a chat reply
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Message index out of range
    #[error("No message #{0}")]
    NoSuchMessage(usize),

    /// Feedback is only collected for assistant messages
    #[error("Message #{0} is not an assistant message")]
    NotAssistantMessage(usize),

    /// Submit requested while the feedback form is not open
    #[error("Feedback form for message #{0} is not open")]
    FeedbackFormClosed(usize),

    /// Submit requested with no text
    #[error("Please enter your feedback before submitting.")]
    EmptyFeedback,

    /// The feedback store rejected the record
    #[error("Failed to save feedback: {0}")]
    Feedback(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Client setup error
    #[error("Setup error: {0}")]
    Setup(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ChatError::Connection(e.to_string())
        } else if e.is_status() {
            match e.status() {
                Some(status) if status.is_client_error() => {
                    ChatError::Api(format!("HTTP {}: {}", status, e))
                }
                Some(status) if status.is_server_error() => {
                    ChatError::Api(format!("Server error (HTTP {})", status))
                }
                _ => ChatError::Api(e.to_string()),
            }
        } else if e.is_decode() {
            ChatError::InvalidResponse(e.to_string())
        } else {
            ChatError::Connection(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}
