//! Configuration for the analysis pipeline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of document characters embedded in the prompt
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 3000;

/// Configuration for the analysis pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Characters of extracted text kept in the prompt (hard cutoff)
    pub max_content_chars: usize,

    /// Accepted file extensions, without the leading dot
    pub allowed_extensions: Vec<String>,

    /// Directory for temporary uploads (OS temp dir when unset)
    pub upload_dir: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            allowed_extensions: vec!["docx".to_string()],
            upload_dir: None,
        }
    }
}

impl AnalyzerConfig {
    /// Check an extension against the allow-list, ignoring case and a leading dot
    pub fn is_allowed_extension(&self, extension: &str) -> bool {
        let wanted = extension.trim_start_matches('.');
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(wanted))
    }

    /// Allowed extensions normalised to lower case without dots
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.allowed_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect()
    }

    /// Directory temporary uploads are written to
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_content_chars == 0 {
            return Err("max_content_chars must be greater than 0".to_string());
        }
        if self.allowed_extensions.is_empty() {
            return Err("allowed_extensions must not be empty".to_string());
        }
        if self
            .allowed_extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err("allowed_extensions must not contain empty entries".to_string());
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
