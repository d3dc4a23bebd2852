//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API.
//!
//! # Features
//!
//! - HTTP communication with Ollama's `/api/generate` endpoint
//! - JSON output mode and sampling options (temperature, token limit)
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! The provider owns a private current-thread tokio runtime so that the
//! blocking `LlmProvider` methods can be called from synchronous code. Do not
//! construct or drop it inside another async runtime.
//!
//! # Examples
//!
//! ```no_run
//! use pawtrail_llm::OllamaProvider;
//! use pawtrail_domain::traits::LlmProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "deepseek-r1:1.5b")?;
//! let json = provider.generate_structured("System: ...\nUser: stray dog in Pune", "json")?;
//! # Ok::<(), pawtrail_llm::LlmError>(())
//! ```

use crate::LlmError;
use pawtrail_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "deepseek-r1:1.5b";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per request (no retry)
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Prompt used to check that the model answers at all
pub const CONNECTIVITY_PROMPT: &str = "Say 'Ollama test successful'";

/// Settings for an [`OllamaProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaSettings {
    /// API endpoint (e.g. "http://localhost:11434")
    pub endpoint: String,
    /// Model to use (e.g. "deepseek-r1:1.5b")
    pub model: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Total attempts per request
    pub max_retries: u32,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub num_predict: Option<u32>,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: Some(0.1),
            num_predict: Some(512),
        }
    }
}

/// Ollama API provider for local LLM inference
///
/// This provider communicates with a local Ollama instance to generate text.
pub struct OllamaProvider {
    settings: OllamaSettings,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    #[serde(default)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "deepseek-r1:1.5b", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::from_settings(OllamaSettings {
            endpoint: endpoint.into(),
            model: model.into(),
            ..OllamaSettings::default()
        })
    }

    /// Create a new Ollama provider on the default endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Create a provider from full settings
    pub fn from_settings(settings: OllamaSettings) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| LlmError::Setup(format!("HTTP client: {}", e)))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Setup(format!("Runtime: {}", e)))?;

        Ok(Self {
            settings,
            client,
            runtime,
        })
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.settings.max_retries = max_retries.max(1);
        self
    }

    /// Model this provider talks to
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Endpoint this provider talks to
    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }

    /// Ask the model for a short fixed reply to confirm it is reachable
    pub fn check_connection(&self) -> Result<String, LlmError> {
        self.runtime.block_on(self.request(CONNECTIVITY_PROMPT, None))
    }

    /// Generate text using Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - The request times out
    /// - Response format is invalid
    pub async fn request(&self, prompt: &str, format: Option<&str>) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.settings.endpoint.trim_end_matches('/'));

        let options = if self.settings.temperature.is_some() || self.settings.num_predict.is_some() {
            Some(GenerateOptions {
                temperature: self.settings.temperature,
                num_predict: self.settings.num_predict,
            })
        } else {
            None
        };

        let request_body = OllamaGenerateRequest {
            model: &self.settings.model,
            prompt,
            stream: false,
            format,
            options,
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.settings.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return match response.json::<OllamaGenerateResponse>().await {
                            Ok(ollama_response) => {
                                debug!(
                                    "Ollama replied with {} chars",
                                    ollama_response.response.len()
                                );
                                Ok(ollama_response.response)
                            }
                            Err(e) => Err(LlmError::InvalidResponse(format!(
                                "Failed to parse response: {}",
                                e
                            ))),
                        };
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.settings.model.clone()));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(LlmError::Timeout(self.settings.timeout.as_secs()));
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.settings.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.runtime.block_on(self.request(prompt, None))
    }

    fn generate_structured(&self, prompt: &str, format: &str) -> Result<String, Self::Error> {
        let format = if format.is_empty() { None } else { Some(format) };
        self.runtime.block_on(self.request(prompt, format))
    }
}
