//! EduSmart Server
//!
//! HTTP surface for courseware analysis and the teaching assistant chat.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use edusmart_analyzer::{AnalysisPipeline, DocxExtractor};
use edusmart_domain::traits::TextGenerator;
use handlers::{create_router, AppState};
use std::fmt::Display;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this more than
/// once is harmless.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Start the HTTP server
///
/// Builds the analysis pipeline around `generator` and serves until the
/// listener fails.
pub async fn start_server<G>(config: ServerConfig, generator: G) -> Result<(), ServerError>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    config.validate()?;

    info!("Starting EduSmart server");
    info!("Bind address: {}", config.bind_addr());
    info!("Model: {}", generator.model_name());
    info!("Upload limit: {} bytes", config.max_upload_bytes);
    info!("Upload directory: {}", config.analyzer.upload_dir().display());

    let pipeline = AnalysisPipeline::new(config.analyzer.clone(), DocxExtractor::new(), generator)
        .with_language(&config.llm.response_language);

    let app = create_router(AppState::new(pipeline, config.max_upload_bytes));

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edusmart_llm::MockProvider;

    #[tokio::test]
    async fn test_invalid_config_rejected_before_bind() {
        let config = ServerConfig {
            max_upload_bytes: 0,
            ..ServerConfig::default_config()
        };

        let result = start_server(config, MockProvider::default()).await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing("debug");
        init_tracing("info");
    }
}
