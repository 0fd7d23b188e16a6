//! Prompt construction for courseware analysis

use crate::config::DEFAULT_MAX_CONTENT_CHARS;

/// Builds the analysis prompt sent to the model
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    max_content_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTENT_CHARS)
    }
}

impl PromptBuilder {
    /// Create a builder that keeps at most `max_content_chars` of the document
    pub fn new(max_content_chars: usize) -> Self {
        Self { max_content_chars }
    }

    /// Build the complete analysis prompt
    pub fn build(&self, text: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str(ANALYSIS_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Content to analyze:\n");
        prompt.push_str(truncate_chars(text, self.max_content_chars));
        prompt.push_str("\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

/// First `max` characters of `text`, never splitting a character
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

const ANALYSIS_INSTRUCTIONS: &str = r#"Analyze the following educational courseware content and provide:
1. Key Topics: List 3-5 main topics covered
2. Learning Objectives: List 3-5 specific learning objectives
3. Suggested Activities: List 3-5 teaching activities that would complement this content

Format your response as JSON with these exact keys:
- key_topics: array of strings
- learning_objectives: array of strings
- suggested_activities: array of strings"#;

const OUTPUT_FORMAT_REMINDER: &str = "Provide ONLY the JSON response, no additional text.";
