//! RAG Server binary
//!
//! Run with: cargo run -p llm-rag --bin llm-rag-server

use llm_rag::config::{LogFormat, LoggingConfig, RagConfig};
use llm_rag::server::RagServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = RagConfig::from_env()?;
    init_tracing(&config.logging);

    if let Err(e) = config.validate() {
        tracing::error!(log_type = "application", "{}", e);
        return Err(e.into());
    }

    tracing::info!(log_type = "application", "Configuration loaded");
    tracing::info!(log_type = "application", "  - Backend: {:?}", config.backend);
    tracing::info!(log_type = "application", "  - Embedding model: {}", config.gemini.embed_model);
    tracing::info!(log_type = "application", "  - LLM model: {}", config.gemini.generate_model);
    tracing::info!(log_type = "application", "  - Weaviate: {}", config.weaviate.base_url());

    // Create and start server
    let server = match RagServer::new(config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(log_type = "application", "Failed to initialize RAG server: {}", e);
            return Err(e.into());
        }
    };

    server.start().await?;

    Ok(())
}
