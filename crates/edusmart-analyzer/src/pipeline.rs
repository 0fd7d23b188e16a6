//! Core analysis pipeline

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, ExtractionError};
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use edusmart_domain::traits::{TextExtractor, TextGenerator};
use edusmart_domain::AnalysisResult;
use edusmart_llm::LanguageModelClient;
use std::fmt::Display;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

const TEMP_PREFIX: &str = "edusmart-upload-";

/// A file received from a client
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// Name the client gave the file
    pub filename: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Create an upload
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased text after the last `.` of the filename, or "" if none
    pub fn extension(&self) -> String {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Turns uploaded courseware into an [`AnalysisResult`]
///
/// Validation, temporary storage, extraction, prompting and parsing. Holds
/// no mutable state; share it behind an `Arc`.
pub struct AnalysisPipeline<E, G> {
    extractor: Arc<E>,
    client: LanguageModelClient<G>,
    prompts: PromptBuilder,
    config: AnalyzerConfig,
}

impl<E, G> AnalysisPipeline<E, G>
where
    E: TextExtractor + Send + Sync + 'static,
    E::Error: Into<ExtractionError> + Send + 'static,
    G: TextGenerator + Sync,
    G::Error: Display,
{
    /// Create a pipeline from its collaborators
    pub fn new(config: AnalyzerConfig, extractor: E, generator: G) -> Self {
        Self {
            extractor: Arc::new(extractor),
            client: LanguageModelClient::new(generator),
            prompts: PromptBuilder::new(config.max_content_chars),
            config,
        }
    }

    /// Ask the model to respond in `language`
    pub fn with_language(mut self, language: &str) -> Self {
        self.client = self.client.with_language(language);
        self
    }

    /// Pipeline configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Never-fail model client used for analysis
    pub fn client(&self) -> &LanguageModelClient<G> {
        &self.client
    }

    /// Name of the model behind the client
    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Analyze an uploaded document
    ///
    /// Input is validated before any I/O. The upload is stored in a uniquely
    /// named temporary file which is removed before this returns, whatever
    /// the outcome. Model failures never produce an error here.
    pub async fn analyze_upload(
        &self,
        upload: Option<Upload>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let span = info_span!("analysis", request_id = %Uuid::now_v7());
        self.run_upload(upload).instrument(span).await
    }

    /// Analyze text that has already been extracted
    pub async fn analyze_text(&self, text: &str) -> AnalysisResult {
        let span = info_span!("analysis", request_id = %Uuid::now_v7());
        self.analyze_content(text).instrument(span).await
    }

    /// Check an upload without touching the filesystem
    pub fn validate(&self, upload: Option<&Upload>) -> Result<(), AnalysisError> {
        let upload = upload.ok_or(AnalysisError::NoFile)?;

        if upload.filename.is_empty() {
            return Err(AnalysisError::EmptyFilename);
        }

        let extension = upload.extension();
        if !self.config.is_allowed_extension(&extension) {
            return Err(AnalysisError::DisallowedExtension {
                extension,
                allowed: self.config.normalized_extensions(),
            });
        }

        Ok(())
    }

    async fn run_upload(&self, upload: Option<Upload>) -> Result<AnalysisResult, AnalysisError> {
        self.validate(upload.as_ref())?;
        let upload = upload.ok_or(AnalysisError::NoFile)?;

        info!(
            "Analyzing upload '{}' ({} bytes)",
            upload.filename,
            upload.bytes.len()
        );

        let text = self.extract_upload(&upload).await?;
        info!("Extracted {} chars of text", text.chars().count());

        Ok(self.analyze_content(&text).await)
    }

    /// Store the upload in a temporary file and extract its text
    ///
    /// The temporary file is dropped (and deleted) when this returns.
    async fn extract_upload(&self, upload: &Upload) -> Result<String, AnalysisError> {
        let suffix = format!(".{}", upload.extension());
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(&suffix)
            .tempfile_in(self.config.upload_dir())
            .map_err(AnalysisError::TempStorage)?;

        temp.write_all(&upload.bytes)
            .and_then(|_| temp.flush())
            .map_err(AnalysisError::TempStorage)?;

        debug!("Stored upload at {}", temp.path().display());

        let extractor = Arc::clone(&self.extractor);
        let path = temp.path().to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&path))
            .await
            .map_err(|e| ExtractionError::Io(std::io::Error::other(e)))?;

        extracted.map_err(|e| AnalysisError::Extraction(e.into()))
    }

    async fn analyze_content(&self, text: &str) -> AnalysisResult {
        let prompt = self.prompts.build(text);
        debug!("Prompt length: {} chars", prompt.len());

        let response = self.client.generate(&prompt).await;
        debug!("Model response ({} chars): {}", response.len(), response);

        let result = parse_response(&response);
        info!(
            "Analysis complete: {} key topics, {} learning objectives, {} suggested activities",
            result.key_topics.len(),
            result.learning_objectives.len(),
            result.suggested_activities.len()
        );

        result
    }
}
