//! EduSmart server CLI
//!
//! Starts the HTTP server for courseware analysis and AI chat.

use anyhow::{Context, Result};
use clap::Parser;
use edusmart_llm::DeepSeekProvider;
use edusmart_server::{config::ServerConfig, init_tracing, start_server};
use std::path::PathBuf;
use std::process;
use tracing::warn;

#[derive(Parser)]
#[command(name = "edusmart-server")]
#[command(about = "EduSmart courseware analysis server", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "EDUSMART_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// DeepSeek API key (overrides llm.api_key)
    #[arg(long, env = "DEEPSEEK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ServerConfig::default_config(),
    };

    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    if let Some(port) = cli.port {
        config.bind_port = port;
    }
    if let Some(api_key) = cli.api_key {
        config.llm.api_key = api_key;
    }

    init_tracing(&config.log_level);

    if cli.config.is_none() {
        warn!("No config file specified, using built-in defaults");
    }
    if config.llm.api_key.is_empty() {
        warn!("No DeepSeek API key configured; the assistant will answer with apologies");
    }

    let provider =
        DeepSeekProvider::from_config(&config.llm).context("Failed to create DeepSeek client")?;

    start_server(config, provider).await?;

    Ok(())
}
