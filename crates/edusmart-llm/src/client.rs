//! Never-fail client wrapping a language model provider

use edusmart_domain::traits::TextGenerator;
use std::fmt::Display;
use tracing::{debug, error};

/// Text returned in place of a completion whenever the provider fails
pub const APOLOGY_MESSAGE: &str =
    "Sorry, the AI assistant is temporarily unavailable. Please try again later.";

/// Build the system instruction sent with every request
///
/// Restricts the assistant to the education domain and to one output
/// language. Models may ignore it; callers must still treat responses as
/// untrusted text.
pub fn system_instruction(language: &str) -> String {
    format!(
        "You are EduSmart, an AI teaching assistant for teachers and students. \
         Only help with topics related to education: teaching, learning, courseware, \
         lesson planning and classroom activities. If a request is unrelated to \
         education, politely decline. Always respond in {}.",
        language
    )
}

/// Client the analysis core talks to
///
/// `generate` always returns text: provider errors are logged and replaced
/// by [`APOLOGY_MESSAGE`].
pub struct LanguageModelClient<P> {
    provider: P,
    system_instruction: String,
}

impl<P> LanguageModelClient<P>
where
    P: TextGenerator,
    P::Error: Display,
{
    /// Wrap a provider, instructing it to answer in English
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            system_instruction: system_instruction("English"),
        }
    }

    /// Change the response language named in the system instruction
    pub fn with_language(mut self, language: &str) -> Self {
        self.system_instruction = system_instruction(language);
        self
    }

    /// The system instruction sent with every request
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Name of the underlying model
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Send `prompt` and return the model's text, or the apology message
    pub async fn generate(&self, prompt: &str) -> String {
        match self.provider.generate(&self.system_instruction, prompt).await {
            Ok(text) => {
                debug!("Model {} returned {} chars", self.model_name(), text.len());
                text
            }
            Err(e) => {
                error!("Model {} call failed: {}", self.model_name(), e);
                APOLOGY_MESSAGE.to_string()
            }
        }
    }
}
