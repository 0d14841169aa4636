//! Document ingestion: validate, extract, chunk, embed, persist

use std::sync::Arc;

use chrono::Utc;

use crate::config::{ChunkingConfig, IngestionConfig};
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::storage::Database;
use crate::types::document::Document;

use super::chunker::TextChunker;
use super::extract::SourceFormat;

/// Outcome of a successful ingestion
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub document_id: String,
    pub document_name: String,
    pub chunk_count: usize,
}

/// Orchestrates one-shot, per-document ingestion
pub struct IngestPipeline {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    db: Database,
    max_file_size: usize,
}

impl IngestPipeline {
    pub fn new(
        ingestion: &IngestionConfig,
        chunking: &ChunkingConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        db: Database,
    ) -> Self {
        Self {
            chunker: TextChunker::from_config(chunking),
            embedder,
            db,
            max_file_size: ingestion.max_file_size,
        }
    }

    /// Ingest one uploaded file for `owner_id`.
    ///
    /// Preconditions are checked in order, each a distinct failure:
    /// allowed extension, size limit, non-empty extracted text, at least one
    /// chunk. The document and all its chunks are then persisted in a single
    /// transaction.
    pub async fn ingest(
        &self,
        owner_id: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<IngestReceipt> {
        let format = SourceFormat::from_filename(filename)?;

        if data.len() > self.max_file_size {
            return Err(Error::Validation(format!(
                "File size must be less than {} MB",
                self.max_file_size / (1024 * 1024)
            )));
        }

        let text = format.extract(data)?;
        if text.trim().is_empty() {
            return Err(Error::Validation("File is empty".to_string()));
        }

        let chunks = self.chunker.chunk(&text);
        if chunks.is_empty() {
            return Err(Error::Validation("Failed to chunk document".to_string()));
        }

        let chunk_texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&chunk_texts).await.map_err(|e| {
            tracing::error!(filename, error = %e, "embedding batch failed during ingestion");
            e
        })?;

        let document = Document {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: filename.to_string(),
            content: text,
            uploaded_at: Utc::now(),
        };

        let receipt = IngestReceipt {
            document_id: document.id.clone(),
            document_name: document.name.clone(),
            chunk_count: chunks.len(),
        };

        let db = self.db.clone();
        let dimensions = self.embedder.dimensions();
        tokio::task::spawn_blocking(move || {
            db.insert_document_with_chunks(&document, &chunks, &embeddings, dimensions)
        })
        .await
        .map_err(|e| Error::Internal(format!("task join error: {}", e)))??;

        tracing::info!(
            document_id = %receipt.document_id,
            chunks = receipt.chunk_count,
            "ingested document"
        );

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedEmbedder {
        dimensions: usize,
        fail: bool,
    }

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            if self.fail {
                return Err(Error::Provider("embedding service down".to_string()));
            }
            Ok(vec![1.0; self.dimensions])
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(!self.fail)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn pipeline(fail_embeddings: bool) -> (IngestPipeline, Database) {
        let db = Database::in_memory().unwrap();
        let pipeline = IngestPipeline::new(
            &IngestionConfig::default(),
            &ChunkingConfig::default(),
            Arc::new(FixedEmbedder {
                dimensions: 4,
                fail: fail_embeddings,
            }),
            db.clone(),
        );
        (pipeline, db)
    }

    #[tokio::test]
    async fn rejects_disallowed_extensions_before_any_work() {
        let (pipeline, _db) = pipeline(true); // embedder would fail if reached
        let err = pipeline
            .ingest("alice", "malware.exe", b"content")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_oversize_files() {
        let (pipeline, _db) = pipeline(false);
        let big = vec![b'a'; 10 * 1024 * 1024 + 1];
        let err = pipeline.ingest("alice", "big.txt", &big).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_empty_content() {
        let (pipeline, _db) = pipeline(false);
        let err = pipeline
            .ingest("alice", "blank.txt", b"   \n  ")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn provider_failure_persists_nothing() {
        let (pipeline, db) = pipeline(true);
        let err = pipeline
            .ingest("alice", "doc.txt", b"Some sentence. Another one.")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert_eq!(db.count_documents("alice").unwrap(), 0);
    }

    #[tokio::test]
    async fn successful_ingest_reports_the_chunk_count() {
        let (pipeline, db) = pipeline(false);
        let receipt = pipeline
            .ingest("alice", "doc.txt", b"A short document. With two sentences.")
            .await
            .unwrap();
        assert_eq!(receipt.document_name, "doc.txt");
        assert_eq!(receipt.chunk_count, 1);
        assert_eq!(db.count_documents("alice").unwrap(), 1);

        let listed = db.list_documents("alice").unwrap();
        assert_eq!(listed[0].chunk_count, 1);
    }
}
