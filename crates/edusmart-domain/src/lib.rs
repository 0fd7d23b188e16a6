//! EduSmart Domain Layer
//!
//! Core value types and collaborator boundaries for courseware analysis.
//! This crate has no external dependencies; infrastructure implementations
//! (docx reading, LLM providers, HTTP) live in other crates.
//!
//! ## Key Concepts
//!
//! - **AnalysisResult**: the fixed three-field summary of a document
//! - **TextGenerator**: a language model that turns a prompt into free text
//! - **TextExtractor**: something that turns a stored document into plain text

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod traits;

// Re-exports for convenience
pub use analysis::AnalysisResult;
pub use traits::{TextExtractor, TextGenerator};
