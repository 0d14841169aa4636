//! Shared application state
//!
//! All external handles (store, providers) are constructed once and passed
//! in; nothing in the request path reaches for ambient globals.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::generation::AnswerComposer;
use crate::ingestion::IngestPipeline;
use crate::providers::{CompletionProvider, EmbeddingProvider};
use crate::retrieval::Retriever;
use crate::sessions::SessionStore;
use crate::storage::Database;

struct StateInner {
    config: AppConfig,
    db: Database,
    embedder: Arc<dyn EmbeddingProvider>,
    pipeline: IngestPipeline,
    composer: AnswerComposer,
    sessions: SessionStore,
}

/// Cloneable handle to everything a request handler needs
#[derive(Clone)]
pub struct AppState {
    inner: Arc<StateInner>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: Database,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn CompletionProvider>,
    ) -> Self {
        let pipeline = IngestPipeline::new(
            &config.ingestion,
            &config.chunking,
            embedder.clone(),
            db.clone(),
        );
        let retriever = Retriever::new(&config.retrieval, embedder.clone(), db.clone());
        let composer = AnswerComposer::new(&config.answers, retriever, llm, db.clone());
        let sessions = SessionStore::new(db.clone());

        Self {
            inner: Arc::new(StateInner {
                config,
                db,
                embedder,
                pipeline,
                composer,
                sessions,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedder
    }

    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    pub fn composer(&self) -> &AnswerComposer {
        &self.inner.composer
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }
}
