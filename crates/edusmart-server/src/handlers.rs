//! HTTP request handlers for the EduSmart server.
//!
//! Implements document analysis, AI chat and health check endpoints using axum.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection}, DefaultBodyLimit, Multipart,
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use edusmart_analyzer::{AnalysisError, AnalysisPipeline, DocxExtractor, Upload};
use edusmart_domain::traits::TextGenerator;
use edusmart_domain::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Multipart field carrying the document
const FILE_FIELD: &str = "file";

/// Shared application state
pub struct AppState<G> {
    /// Analysis pipeline (also owns the model client used for chat)
    pub pipeline: Arc<AnalysisPipeline<DocxExtractor, G>>,
    /// Request body limit in bytes
    pub max_upload_bytes: usize,
}

impl<G> AppState<G> {
    /// Create application state around a pipeline
    pub fn new(pipeline: AnalysisPipeline<DocxExtractor, G>, max_upload_bytes: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            max_upload_bytes,
        }
    }
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// The three analysis lists as sent over the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisBody {
    /// Main topics covered by the document
    pub key_topics: Vec<String>,
    /// Specific learning objectives
    pub learning_objectives: Vec<String>,
    /// Teaching activities that complement the content
    pub suggested_activities: Vec<String>,
}

impl From<AnalysisResult> for AnalysisBody {
    fn from(result: AnalysisResult) -> Self {
        Self {
            key_topics: result.key_topics,
            learning_objectives: result.learning_objectives,
            suggested_activities: result.suggested_activities,
        }
    }
}

/// Successful analysis response
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Always true
    pub success: bool,
    /// The analysis
    pub analysis: AnalysisBody,
}

/// Failed analysis response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error message
    pub error: String,
}

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's question
    #[serde(default)]
    pub message: Option<String>,
}

/// Chat response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant's answer (or the apology text)
    pub response: String,
}

/// Chat error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatErrorResponse {
    /// Error message
    pub error: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Model behind the assistant
    pub model: String,
    /// Accepted upload extensions
    pub allowed_extensions: Vec<String>,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// Analysis pipeline error
    Analysis(AnalysisError),
    /// Malformed or oversized multipart body
    Multipart(MultipartError),
    /// Chat request without a message
    MissingMessage,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Analysis(e) if e.is_input_error() => {
                warn!("Rejected upload: {:?}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Analysis(e) => {
                error!("Analysis failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Multipart(e) => {
                warn!("Bad multipart body: {}", e);
                (e.status(), e.body_text())
            }
            ApiError::MissingMessage => {
                let body = Json(ChatErrorResponse {
                    error: "Message is required".to_string(),
                });
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: message,
        });
        (status, body).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        ApiError::Analysis(e)
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::Multipart(e)
    }
}

/// Read the first `file` field that carries a filename
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // A field without a filename attribute is a form value, not a file
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;
        return Ok(Some(Upload::new(filename, bytes.to_vec())));
    }
    Ok(None)
}

/// POST /api/teacher-tasks/analyze-document - Analyze an uploaded .docx
///
/// A body that is not multipart at all carries no file.
async fn analyze_document<G>(
    State(state): State<AppState<G>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    let upload = match multipart {
        Ok(mut multipart) => read_upload(&mut multipart).await?,
        Err(rejection) => {
            warn!("Analysis request is not multipart: {}", rejection);
            None
        }
    };
    let result = state.pipeline.analyze_upload(upload).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis: result.into(),
    }))
}

/// POST /api/ai/chat - Ask the teaching assistant a question
async fn chat<G>(
    State(state): State<AppState<G>>,
    payload: Option<Json<ChatRequest>>,
) -> Result<Json<ChatResponse>, ApiError>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    let message = payload
        .and_then(|Json(request)| request.message)
        .filter(|m| !m.trim().is_empty())
        .ok_or(ApiError::MissingMessage)?;

    info!("Chat request ({} chars)", message.chars().count());
    let response = state.pipeline.client().generate(&message).await;

    Ok(Json(ChatResponse { response }))
}

/// GET /health - Service health and model
async fn health_check<G>(State(state): State<AppState<G>>) -> Json<HealthCheckResponse>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        model: state.pipeline.model_name().to_string(),
        allowed_extensions: state.pipeline.config().normalized_extensions(),
    })
}

/// Create the axum router with all routes
pub fn create_router<G>(state: AppState<G>) -> AxumRouter
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    let body_limit = state.max_upload_bytes;

    AxumRouter::new()
        .route("/api/teacher-tasks/analyze-document", post(analyze_document::<G>))
        .route("/api/ai/chat", post(chat::<G>))
        .route("/health", get(health_check::<G>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
