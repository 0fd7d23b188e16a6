//! End-to-end tests for the analysis pipeline

use crate::{AnalysisError, AnalysisPipeline, AnalyzerConfig, DocxExtractor, ExtractionError, Upload};
use docx_rs::{Docx, Paragraph, Run};
use edusmart_domain::traits::TextExtractor;
use edusmart_llm::MockProvider;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const BIOLOGY_JSON: &str = r#"{
    "key_topics": ["Cell structure", "Mitosis", "Meiosis"],
    "learning_objectives": ["Describe organelles", "Compare mitosis and meiosis"],
    "suggested_activities": ["Microscope lab"]
}"#;

fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let mut docx = Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }
    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).unwrap();
    buffer.into_inner()
}

fn config_in(dir: &TempDir) -> AnalyzerConfig {
    AnalyzerConfig {
        upload_dir: Some(dir.path().to_path_buf()),
        ..AnalyzerConfig::default()
    }
}

fn dir_is_empty(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path()).unwrap().next().is_none()
}

/// Extractor that records every path it is handed
#[derive(Clone, Default)]
struct RecordingExtractor {
    calls: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl TextExtractor for RecordingExtractor {
    type Error = ExtractionError;

    fn extract(&self, path: &Path) -> Result<String, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(path.to_path_buf());
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[tokio::test]
async fn test_full_analysis_flow() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = AnalysisPipeline::new(
        config_in(&dir),
        DocxExtractor::new(),
        MockProvider::new(BIOLOGY_JSON),
    );

    let upload = Upload::new(
        "biology.docx",
        docx_bytes(&["Cells are the basic unit of life.", "Cells divide by mitosis."]),
    );
    let result = pipeline.analyze_upload(Some(upload)).await.unwrap();

    assert_eq!(result.key_topics, vec!["Cell structure", "Mitosis", "Meiosis"]);
    assert_eq!(result.learning_objectives.len(), 2);
    assert_eq!(result.suggested_activities, vec!["Microscope lab"]);

    let prompt = pipeline.client().provider().last_prompt().unwrap();
    assert!(prompt.contains("Cells are the basic unit of life.\nCells divide by mitosis."));
    assert!(dir_is_empty(&dir), "temporary upload should be removed");
}

#[tokio::test]
async fn test_unstructured_response_uses_section_parser() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = AnalysisPipeline::new(
        config_in(&dir),
        DocxExtractor::new(),
        MockProvider::new(
            "Sure! Here is the analysis.\n\
             Key Topics:\n\
             1. Cell structure\n\
             2. Mitosis\n\
             3. Meiosis\n\
             Learning Objectives:\n\
             - Describe organelles\n\
             - Compare mitosis and meiosis\n",
        ),
    );

    let upload = Upload::new("biology.docx", docx_bytes(&["Cells"]));
    let result = pipeline.analyze_upload(Some(upload)).await.unwrap();

    assert_eq!(result.key_topics.len(), 3);
    assert_eq!(result.learning_objectives.len(), 2);
    assert!(result.suggested_activities.is_empty());
}

#[tokio::test]
async fn test_empty_document_succeeds_with_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = AnalysisPipeline::new(
        config_in(&dir),
        DocxExtractor::new(),
        MockProvider::new(
            r#"{"key_topics": [], "learning_objectives": [], "suggested_activities": []}"#,
        ),
    );

    let upload = Upload::new("blank.docx", docx_bytes(&[]));
    let result = pipeline.analyze_upload(Some(upload)).await.unwrap();

    assert!(result.is_empty());
    let prompt = pipeline.client().provider().last_prompt().unwrap();
    assert!(prompt.contains("Content to analyze:\n\n"));
}

#[tokio::test]
async fn test_disallowed_extension_rejected_before_io() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = RecordingExtractor::default();
    let pipeline = AnalysisPipeline::new(
        config_in(&dir),
        extractor.clone(),
        MockProvider::new(BIOLOGY_JSON),
    );

    let result = pipeline
        .analyze_upload(Some(Upload::new("slides.pdf", b"%PDF-1.7".to_vec())))
        .await;

    match result {
        Err(AnalysisError::DisallowedExtension { extension, allowed }) => {
            assert_eq!(extension, "pdf");
            assert_eq!(allowed, vec!["docx"]);
        }
        other => panic!("expected DisallowedExtension, got {:?}", other),
    }
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    assert_eq!(pipeline.client().provider().call_count(), 0);
    assert!(dir_is_empty(&dir));
}

#[tokio::test]
async fn test_missing_file_and_empty_name() {
    let extractor = RecordingExtractor::default();
    let pipeline = AnalysisPipeline::new(
        AnalyzerConfig::default(),
        extractor.clone(),
        MockProvider::new(BIOLOGY_JSON),
    );

    assert!(matches!(
        pipeline.analyze_upload(None).await,
        Err(AnalysisError::NoFile)
    ));
    assert!(matches!(
        pipeline.analyze_upload(Some(Upload::new("", vec![0u8; 4]))).await,
        Err(AnalysisError::EmptyFilename)
    ));
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    assert_eq!(pipeline.client().provider().call_count(), 0);
}

#[tokio::test]
async fn test_extraction_failure_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = AnalysisPipeline::new(
        config_in(&dir),
        DocxExtractor::new(),
        MockProvider::new(BIOLOGY_JSON),
    );

    let upload = Upload::new("broken.docx", b"not really a docx".to_vec());
    let result = pipeline.analyze_upload(Some(upload)).await;

    let err = result.unwrap_err();
    assert!(matches!(err, AnalysisError::Extraction(_)));
    assert!(err.to_string().starts_with("Failed to extract text from document: "));
    assert_eq!(pipeline.client().provider().call_count(), 0);
    assert!(dir_is_empty(&dir), "temporary upload should be removed on failure");
}

#[tokio::test]
async fn test_temp_file_is_uniquely_named() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = RecordingExtractor::default();
    let pipeline = AnalysisPipeline::new(
        config_in(&dir),
        extractor.clone(),
        MockProvider::new("{}"),
    );

    pipeline
        .analyze_upload(Some(Upload::new("Lesson.docx", b"first".to_vec())))
        .await
        .unwrap();
    pipeline
        .analyze_upload(Some(Upload::new("Lesson.docx", b"second".to_vec())))
        .await
        .unwrap();

    let paths = extractor.paths.lock().unwrap().clone();
    assert_eq!(paths.len(), 2);
    assert_ne!(paths[0], paths[1]);
    for path in &paths {
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("edusmart-upload-"), "{}", name);
        assert!(name.ends_with(".docx"), "{}", name);
        assert_ne!(name, "Lesson.docx");
        assert_eq!(path.parent(), Some(dir.path()));
        assert!(!path.exists());
    }
}

#[tokio::test]
async fn test_extractor_sees_uploaded_bytes() {
    let extractor = RecordingExtractor::default();
    let dir = tempfile::tempdir().unwrap();
    let pipeline = AnalysisPipeline::new(
        config_in(&dir),
        extractor,
        MockProvider::new("{}"),
    );

    pipeline
        .analyze_upload(Some(Upload::new("notes.docx", b"Plate tectonics".to_vec())))
        .await
        .unwrap();

    let prompt = pipeline.client().provider().last_prompt().unwrap();
    assert!(prompt.contains("Content to analyze:\nPlate tectonics"));
}

#[tokio::test]
async fn test_model_outage_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = AnalysisPipeline::new(
        config_in(&dir),
        DocxExtractor::new(),
        MockProvider::failing(),
    );

    let upload = Upload::new("lesson.docx", docx_bytes(&["Volcanoes erupt."]));
    let result = pipeline.analyze_upload(Some(upload)).await.unwrap();

    assert!(result.is_empty());
    assert_eq!(pipeline.client().provider().call_count(), 1);
    assert!(dir_is_empty(&dir));
}

#[tokio::test]
async fn test_custom_allow_list() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalyzerConfig {
        allowed_extensions: vec!["docx".to_string(), ".TXT".to_string()],
        ..config_in(&dir)
    };
    let extractor = RecordingExtractor::default();
    let pipeline = AnalysisPipeline::new(config, extractor.clone(), MockProvider::new("{}"));

    pipeline
        .analyze_upload(Some(Upload::new("notes.txt", b"Rivers and lakes".to_vec())))
        .await
        .unwrap();

    let paths = extractor.paths.lock().unwrap().clone();
    assert!(paths[0].to_string_lossy().ends_with(".txt"));
}
