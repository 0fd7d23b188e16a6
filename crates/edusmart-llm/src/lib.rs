//! EduSmart LLM Provider Layer
//!
//! Pluggable language model providers plus the never-fail client the
//! analysis core talks to.
//!
//! # Architecture
//!
//! Providers implement the `TextGenerator` trait from `edusmart-domain` and
//! report failures as `LlmError`. The core never sees those errors: it calls
//! `LanguageModelClient`, which converts any provider failure into a fixed
//! apology message.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic scripted responses for testing
//! - `DeepSeekProvider`: OpenAI-compatible chat completion API
//!
//! # Examples
//!
//! ```
//! use edusmart_llm::{LanguageModelClient, MockProvider};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let client = LanguageModelClient::new(MockProvider::new("Hello from LLM!"));
//! let text = client.generate("test prompt").await;
//! assert_eq!(text, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod deepseek;

use edusmart_domain::traits::TextGenerator;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use client::{system_instruction, LanguageModelClient, APOLOGY_MESSAGE};
pub use config::LlmConfig;
pub use deepseek::DeepSeekProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// API key rejected by the provider
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Clones share their script and call log.
///
/// # Examples
///
/// ```
/// use edusmart_llm::MockProvider;
///
/// let mut provider = MockProvider::new("Fixed response");
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Option<String>,
    responses: Arc<Mutex<HashMap<String, Option<String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Some(response.into()),
            responses: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a provider whose every call fails with a communication error
    pub fn failing() -> Self {
        Self {
            default_response: None,
            ..Self::new("")
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.script().insert(prompt.into(), Some(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.script().insert(prompt.into(), None);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count and the prompt log
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.log().clear();
    }

    /// The most recent prompt received, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.log().last().cloned()
    }

    fn script(&self) -> std::sync::MutexGuard<'_, HashMap<String, Option<String>>> {
        self.responses.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.prompts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn respond(&self, prompt: &str) -> Result<String, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.log().push(prompt.to_string());

        let scripted = self.script().get(prompt).cloned();
        match scripted {
            Some(Some(response)) => Ok(response),
            Some(None) => Err(LlmError::Other("Mock error".to_string())),
            None => self
                .default_response
                .clone()
                .ok_or_else(|| LlmError::Communication("Mock provider offline".to_string())),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl TextGenerator for MockProvider {
    type Error = LlmError;

    async fn generate(&self, _system: &str, prompt: &str) -> Result<String, Self::Error> {
        self.respond(prompt)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
