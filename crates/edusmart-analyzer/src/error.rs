//! Error types for document analysis

use thiserror::Error;

/// Errors that can occur while reading text out of a document
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file could not be opened or read
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable .docx container
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Errors surfaced by the analysis pipeline
///
/// Model failures and unparseable model output are never reported here;
/// they degrade to an empty or partial `AnalysisResult` instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No file was attached to the request
    #[error("No file provided")]
    NoFile,

    /// A file was attached but its name is empty
    #[error("No file selected")]
    EmptyFilename,

    /// The file extension is not on the allow-list
    #[error("Only {} files are allowed", format_allowed(.allowed))]
    DisallowedExtension {
        /// Extension of the rejected file (lower-cased, may be empty)
        extension: String,
        /// Extensions the pipeline accepts
        allowed: Vec<String>,
    },

    /// Text extraction failed
    #[error("Failed to extract text from document: {0}")]
    Extraction(#[from] ExtractionError),

    /// The upload could not be written to temporary storage
    #[error("Failed to store upload: {0}")]
    TempStorage(#[source] std::io::Error),
}

impl AnalysisError {
    /// True for errors caused by the caller's input (resubmit to recover)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoFile
                | AnalysisError::EmptyFilename
                | AnalysisError::DisallowedExtension { .. }
        )
    }
}

fn format_allowed(allowed: &[String]) -> String {
    allowed
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ")
}
