//! Question-to-chunk retrieval with relevance filtering

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::storage::Database;

/// A chunk retrieved for a question, nearest first
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub chunk_id: String,
    pub document_id: String,
    /// Display name of the owning document
    pub document_name: String,
    pub content: String,
    /// Cosine distance to the question embedding
    pub distance: f32,
    /// `round((1 - distance) * 100) / 100`
    pub similarity: f32,
}

/// Embeds a question and finds the most similar owned chunks
pub struct Retriever {
    db: Database,
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
    max_distance: f32,
}

impl Retriever {
    pub fn new(
        config: &RetrievalConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        db: Database,
    ) -> Self {
        Self {
            db,
            embedder,
            top_k: config.top_k,
            max_distance: config.max_distance,
        }
    }

    /// Retrieve the chunks most relevant to `question`, ordered ascending by
    /// cosine distance.
    ///
    /// When `document_id` is given the query is restricted to that document
    /// after verifying the caller owns it. Candidates at or beyond the
    /// distance cutoff are dropped after the top-k fetch, so an empty result
    /// means "nothing relevant enough", not "no chunks at all".
    pub async fn retrieve(
        &self,
        owner_id: &str,
        question: &str,
        document_id: Option<&str>,
    ) -> Result<Vec<RetrievedChunk>> {
        if let Some(doc_id) = document_id {
            match self.db.document_owner(doc_id)? {
                Some(owner) if owner == owner_id => {}
                _ => return Err(Error::NotFoundOrUnauthorized("Document")),
            }
        }

        let query_embedding = self.embedder.embed(question).await.map_err(|e| {
            tracing::error!(error = %e, "failed to embed question");
            e
        })?;

        let db = self.db.clone();
        let owner = owner_id.to_string();
        let doc_filter = document_id.map(|s| s.to_string());
        let top_k = self.top_k;
        let hits = tokio::task::spawn_blocking(move || {
            db.nearest_chunks(&owner, &query_embedding, top_k, doc_filter.as_deref())
        })
        .await
        .map_err(|e| Error::Internal(format!("task join error: {}", e)))??;

        let relevant: Vec<_> = hits
            .into_iter()
            .filter(|hit| hit.distance < self.max_distance)
            .collect();

        let document_ids: Vec<String> = {
            let mut ids: Vec<String> = relevant.iter().map(|h| h.document_id.clone()).collect();
            ids.sort();
            ids.dedup();
            ids
        };
        let names = self.db.document_names(&document_ids)?;

        Ok(relevant
            .into_iter()
            .map(|hit| {
                let document_name = names
                    .get(&hit.document_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string());
                RetrievedChunk {
                    similarity: round2(1.0 - hit.distance),
                    chunk_id: hit.chunk_id,
                    document_id: hit.document_id,
                    document_name,
                    content: hit.content,
                    distance: hit.distance,
                }
            })
            .collect())
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetrievalConfig;
    use crate::ingestion::chunker::ChunkPiece;
    use crate::types::document::Document;
    use async_trait::async_trait;
    use chrono::Utc;

    /// Maps marker words to fixed directions so distances are predictable
    struct KeywordEmbedder;

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains("paris") {
                Ok(vec![1.0, 0.0, 0.0])
            } else if text.contains("rome") {
                Ok(vec![0.8, 0.6, 0.0])
            } else {
                Ok(vec![0.0, 0.0, 1.0])
            }
        }

        fn dimensions(&self) -> usize {
            3
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "keyword"
        }
    }

    fn seed(db: &Database, owner: &str, name: &str, chunks: &[(&str, Vec<f32>)]) -> String {
        let document = Document {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner.to_string(),
            name: name.to_string(),
            content: "content".to_string(),
            uploaded_at: Utc::now(),
        };
        let pieces: Vec<ChunkPiece> = chunks
            .iter()
            .map(|(content, _)| ChunkPiece {
                content: content.to_string(),
                token_count: 1,
            })
            .collect();
        let embeddings: Vec<Vec<f32>> = chunks.iter().map(|(_, e)| e.clone()).collect();
        db.insert_document_with_chunks(&document, &pieces, &embeddings, 3)
            .unwrap();
        document.id
    }

    fn retriever(db: &Database) -> Retriever {
        Retriever::new(
            &RetrievalConfig::default(),
            Arc::new(KeywordEmbedder),
            db.clone(),
        )
    }

    #[tokio::test]
    async fn results_are_ordered_nearest_first_with_rounded_similarity() {
        let db = Database::in_memory().unwrap();
        seed(
            &db,
            "alice",
            "cities.txt",
            &[
                ("about paris", vec![1.0, 0.0, 0.0]),
                ("about rome", vec![0.8, 0.6, 0.0]),
            ],
        );

        let results = retriever(&db).retrieve("alice", "paris", None).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "about paris");
        assert!(results
            .windows(2)
            .all(|w| w[0].distance <= w[1].distance));
        assert!((results[0].similarity - 1.0).abs() < f32::EPSILON);
        // cos = 0.8 -> distance 0.2 -> similarity 0.8
        assert!((results[1].similarity - 0.8).abs() < 1e-6);
        assert_eq!(results[0].document_name, "cities.txt");
    }

    #[tokio::test]
    async fn distant_chunks_are_filtered_out_after_the_fetch() {
        let db = Database::in_memory().unwrap();
        seed(
            &db,
            "alice",
            "doc.txt",
            &[
                ("relevant paris text", vec![1.0, 0.0, 0.0]),
                ("orthogonal noise", vec![0.0, 1.0, 0.0]),
            ],
        );

        let results = retriever(&db).retrieve("alice", "paris", None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "relevant paris text");
        assert!(results[0].distance < 0.75);
    }

    #[tokio::test]
    async fn irrelevant_question_yields_an_empty_set() {
        let db = Database::in_memory().unwrap();
        seed(
            &db,
            "alice",
            "doc.txt",
            &[("about paris", vec![1.0, 0.0, 0.0])],
        );

        let results = retriever(&db)
            .retrieve("alice", "gibberish zzz", None)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn scoping_to_an_unowned_document_is_rejected() {
        let db = Database::in_memory().unwrap();
        let bobs_doc = seed(&db, "bob", "bob.txt", &[("paris", vec![1.0, 0.0, 0.0])]);

        let err = retriever(&db)
            .retrieve("alice", "paris", Some(&bobs_doc))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFoundOrUnauthorized("Document")));
    }

    #[tokio::test]
    async fn unscoped_search_never_crosses_owners() {
        let db = Database::in_memory().unwrap();
        seed(&db, "bob", "bob.txt", &[("paris secret", vec![1.0, 0.0, 0.0])]);
        seed(&db, "alice", "mine.txt", &[("my paris notes", vec![1.0, 0.0, 0.0])]);

        let results = retriever(&db).retrieve("alice", "paris", None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "my paris notes");
    }
}
