//! EduSmart Analyzer
//!
//! Turns uploaded courseware documents into a pedagogical summary: key
//! topics, learning objectives and suggested activities.
//!
//! # Architecture
//!
//! ```text
//! Upload → validate → temp file → DocxExtractor → PromptBuilder
//!        → LanguageModelClient → parse_response → AnalysisResult
//! ```
//!
//! The model is treated as untrusted. Its answer is first parsed as strict
//! JSON; if that fails structurally, a line-oriented section parser recovers
//! what it can. Model outages surface as an empty result, not as an error.
//!
//! # Example Usage
//!
//! ```no_run
//! use edusmart_analyzer::{AnalysisPipeline, AnalyzerConfig, DocxExtractor, Upload};
//! use edusmart_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let model = MockProvider::new(r#"{"key_topics": ["Fractions"]}"#);
//! let pipeline = AnalysisPipeline::new(AnalyzerConfig::default(), DocxExtractor::new(), model);
//!
//! let bytes = std::fs::read("lesson.docx")?;
//! let analysis = pipeline.analyze_upload(Some(Upload::new("lesson.docx", bytes))).await?;
//!
//! println!("Key topics: {:?}", analysis.key_topics);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extract;
mod parser;
mod pipeline;
mod prompt;

#[cfg(test)]
mod tests;

pub use config::{AnalyzerConfig, DEFAULT_MAX_CONTENT_CHARS};
pub use error::{AnalysisError, ExtractionError};
pub use extract::DocxExtractor;
pub use parser::{parse_response, parse_sections, parse_strict};
pub use pipeline::{AnalysisPipeline, Upload};
pub use prompt::PromptBuilder;
