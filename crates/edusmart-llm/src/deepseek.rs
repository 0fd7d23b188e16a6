//! DeepSeek Provider Implementation
//!
//! Talks to DeepSeek (or any OpenAI-compatible service) through the
//! non-streaming chat completion endpoint.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - One system message plus one user message per call
//! - Retry logic with exponential backoff on transport, 429 and 5xx failures
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use edusmart_llm::{DeepSeekProvider, LlmConfig};
//!
//! let config = LlmConfig {
//!     api_key: "sk-...".to_string(),
//!     ..LlmConfig::default()
//! };
//! let provider = DeepSeekProvider::from_config(&config).unwrap();
//! ```

use crate::config::LlmConfig;
use crate::LlmError;
use edusmart_domain::traits::TextGenerator;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Chat completion provider for DeepSeek and compatible APIs
pub struct DeepSeekProvider {
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    client: reqwest::Client,
    max_retries: u32,
    retry_backoff: Duration,
}

/// Request body for the chat completion API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat completion API (only the fields we read)
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl DeepSeekProvider {
    /// Create a provider from explicit settings, using default timeout and retries
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let config = LlmConfig {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            ..LlmConfig::default()
        };
        Self::from_config(&config)
    }

    /// Create a provider from an `LlmConfig`
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            client,
            max_retries: config.max_retries.max(1),
            retry_backoff: config.retry_backoff(),
        })
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the delay before the first retry
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    /// Send one chat completion request, retrying transient failures
    ///
    /// # Errors
    ///
    /// - `Unauthorized` when the API key is rejected (no retry)
    /// - `ModelNotAvailable` on 404 (no retry)
    /// - `InvalidResponse` when the body cannot be decoded or has no content
    /// - `RateLimitExceeded` / `Communication` once retries are exhausted
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let url = self.completions_url();
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: false,
            temperature: self.temperature,
        };

        debug!(
            "Calling chat completion API, model: {}, prompt length: {} chars",
            self.model,
            prompt.len()
        );

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            let mut request = self.client.post(&url).json(&request_body);
            if !self.api_key.is_empty() {
                request = request.bearer_auth(&self.api_key);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Self::read_content(response).await;
                    }
                    match status {
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            return Err(LlmError::Unauthorized(format!("HTTP {}", status)));
                        }
                        StatusCode::NOT_FOUND => {
                            return Err(LlmError::ModelNotAvailable(self.model.clone()));
                        }
                        StatusCode::TOO_MANY_REQUESTS => {
                            last_error = Some(LlmError::RateLimitExceeded);
                        }
                        _ => {
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
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = backoff_delay(self.retry_backoff, attempts);
                warn!(
                    "Chat completion attempt {}/{} failed, retrying in {:?}",
                    attempts, self.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    async fn read_content(response: reqwest::Response) -> Result<String, LlmError> {
        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| LlmError::InvalidResponse("Response has no content".to_string()))
    }
}

/// Delay before retry number `retry` (1-based): base, 2x base, 4x base, ...
///
/// Saturates at `Duration::MAX` instead of overflowing.
fn backoff_delay(base: Duration, retry: u32) -> Duration {
    match 2u32.checked_pow(retry.saturating_sub(1)) {
        Some(factor) => base.saturating_mul(factor),
        None if base.is_zero() => Duration::ZERO,
        None => Duration::MAX,
    }
}

impl TextGenerator for DeepSeekProvider {
    type Error = LlmError;

    async fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error> {
        self.complete(system, prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
