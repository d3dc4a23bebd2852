//! HTTP client for the remote chat-completion API.

use crate::error::ChatError;
use pawtrail_domain::traits::ChatBackend;
use pawtrail_domain::ChatReply;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default timeout for chat requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chat request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
    session_id: Option<&'a str>,
    model: &'a str,
}

/// Chat response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    answer: String,
    session_id: String,
    model: String,
}

/// Client for the chat API
#[derive(Debug, Clone)]
pub struct ChatClient {
    api_url: String,
    http_client: reqwest::Client,
}

impl ChatClient {
    /// Create a client for `api_url` with the default timeout
    pub fn new(api_url: &str) -> Result<Self, ChatError> {
        Self::with_timeout(api_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client for `api_url` with a custom request timeout
    pub fn with_timeout(api_url: &str, timeout: Duration) -> Result<Self, ChatError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Setup(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Base URL of the API
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Send one prompt to `<api_url>/chat`
    pub async fn chat(
        &self,
        prompt: &str,
        session_id: Option<&str>,
        model: &str,
    ) -> Result<ChatReply, ChatError> {
        let url = format!("{}/chat", self.api_url);

        let request = ChatRequest {
            question: prompt,
            session_id,
            model,
        };

        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let body = response.text().await?;
        let chat_response: ChatResponse = serde_json::from_str(&body)?;

        debug!(
            "Chat reply from {} ({} chars, session {})",
            chat_response.model,
            chat_response.answer.len(),
            chat_response.session_id
        );

        Ok(ChatReply {
            answer: chat_response.answer,
            session_id: chat_response.session_id,
            model: chat_response.model,
        })
    }
}

impl ChatBackend for ChatClient {
    type Error = ChatError;

    async fn send(
        &self,
        prompt: &str,
        session_id: Option<&str>,
        model: &str,
    ) -> Result<ChatReply, Self::Error> {
        self.chat(prompt, session_id, model).await
    }
}
