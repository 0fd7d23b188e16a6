//! Plain-text extraction from .docx documents

use crate::error::ExtractionError;
use docx_rs::{DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild};
use edusmart_domain::traits::TextExtractor;
use std::path::Path;
use tracing::debug;

/// Reads body paragraphs out of a .docx file
///
/// Each paragraph contributes the text of its runs (tabs as `\t`, breaks as
/// `\n`), including runs nested in hyperlinks and tracked insertions. Blank
/// and whitespace-only paragraphs are skipped; the rest are joined with
/// newlines in document order. Tables are not walked.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract text from an in-memory .docx container
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| ExtractionError::InvalidDocument(e.to_string()))?;

        let paragraphs = docx.document.children.iter().filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        });

        let text = join_paragraphs(paragraphs);
        debug!("Extracted {} chars from document", text.len());
        Ok(text)
    }
}

impl TextExtractor for DocxExtractor {
    type Error = ExtractionError;

    fn extract(&self, path: &Path) -> Result<String, Self::Error> {
        let bytes = std::fs::read(path)?;
        self.extract_bytes(&bytes)
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&paragraph.children, &mut text);
    text
}

fn push_children_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, text),
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, text),
            ParagraphChild::Insert(insert) => {
                for insert_child in &insert.children {
                    if let InsertChild::Run(run) = insert_child {
                        push_run_text(run, text);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &Run, text: &mut String) {
    for run_child in &run.children {
        match run_child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

/// Join paragraphs with newlines, dropping blank ones
fn join_paragraphs<I>(paragraphs: I) -> String
where
    I: IntoIterator<Item = String>,
{
    paragraphs
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
