//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the analysis core and
//! infrastructure. Implementations live in other crates.

use std::future::Future;
use std::path::Path;

/// Trait for language model providers
///
/// Implemented by the infrastructure layer (edusmart-llm). Providers report
/// failures through `Self::Error`; callers that must never fail wrap a
/// provider in `edusmart_llm::LanguageModelClient`.
pub trait TextGenerator {
    /// Error type for generation failures
    type Error;

    /// Generate a completion for `prompt` under the `system` instruction
    fn generate(
        &self,
        system: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Name of the model answering requests (for logs and health output)
    fn model_name(&self) -> &str;
}

/// Trait for reading plain text out of a stored document
///
/// Implemented by the application layer (edusmart-analyzer)
pub trait TextExtractor {
    /// Error type for extraction failures
    type Error;

    /// Extract the document's paragraphs as newline-joined text
    ///
    /// A document with no non-blank paragraphs yields an empty string,
    /// not an error.
    fn extract(&self, path: &Path) -> Result<String, Self::Error>;
}
