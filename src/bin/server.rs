//! askdocs server binary
//!
//! Run with: cargo run --bin askdocs-server [config.toml]

use std::path::PathBuf;
use std::sync::Arc;

use askdocs::config::AppConfig;
use askdocs::providers::{CompletionProvider, EmbeddingProvider, OpenAiProvider};
use askdocs::server::{self, state::AppState};
use askdocs::storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askdocs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    tracing::info!("configuration loaded");
    tracing::info!("  - embedding model: {} ({} dims)", config.model.embed_model, config.model.dimensions);
    tracing::info!("  - chat model: {}", config.model.chat_model);
    tracing::info!("  - database: {}", config.database.path.display());
    tracing::info!(
        "  - chunking: {}..{} tokens, {} overlap",
        config.chunking.min_tokens,
        config.chunking.max_tokens,
        config.chunking.overlap_tokens
    );

    let db = Database::open(&config.database.path)?;

    let provider = Arc::new(OpenAiProvider::new(&config.model)?);
    let embedder: Arc<dyn EmbeddingProvider> = provider.clone();
    let llm: Arc<dyn CompletionProvider> = provider;

    match embedder.health_check().await {
        Ok(true) => tracing::info!("model service reachable at {}", config.model.base_url),
        _ => tracing::warn!(
            "model service not reachable at {}; uploads and questions will fail until it is",
            config.model.base_url
        ),
    }

    let server_config = config.server.clone();
    let state = AppState::new(config, db, embedder, llm);

    server::serve(state, &server_config).await?;

    Ok(())
}
