//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{ChatReply, FeedbackRecord};
use std::future::Future;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (pawtrail-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured output; `format` names the output format the
    /// provider should enforce (e.g. "json")
    fn generate_structured(&self, prompt: &str, format: &str) -> Result<String, Self::Error>;
}

/// Trait for storing feedback about assistant answers
///
/// Implemented by the infrastructure layer (pawtrail-chat)
pub trait FeedbackRecorder {
    /// Error type for store operations
    type Error;

    /// Persist one feedback record
    fn record(&self, record: &FeedbackRecord) -> Result<(), Self::Error>;
}

/// Trait for a remote chat-completion service
///
/// Implemented by the infrastructure layer (pawtrail-chat)
pub trait ChatBackend {
    /// Error type for chat requests
    type Error;

    /// Send a prompt, continuing `session_id` when one is known
    fn send(
        &self,
        prompt: &str,
        session_id: Option<&str>,
        model: &str,
    ) -> impl Future<Output = Result<ChatReply, Self::Error>> + Send;
}
