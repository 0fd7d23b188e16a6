//! Configuration for language model providers

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default DeepSeek API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com";

/// Default chat model
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Upper bound accepted for `max_retries`
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Provider settings, loaded from the `[llm]` table of the server config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API
    pub endpoint: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Bearer token; empty means no Authorization header
    pub api_key: String,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Attempts per request, including the first
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each further retry (milliseconds)
    pub retry_backoff_ms: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Language the model is instructed to answer in
    pub response_language: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            timeout_secs: 60,
            max_retries: 3,
            retry_backoff_ms: 1_000,
            temperature: 0.7,
            response_language: "English".to_string(),
        }
    }
}

impl LlmConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the initial retry backoff as a Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("llm.endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("llm.model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("llm.timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("llm.max_retries must be at least 1".to_string());
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(format!(
                "llm.max_retries must be at most {}",
                MAX_RETRIES_LIMIT
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("llm.temperature must be within [0.0, 2.0]".to_string());
        }
        if self.response_language.trim().is_empty() {
            return Err("llm.response_language must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
