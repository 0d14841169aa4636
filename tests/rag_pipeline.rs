//! End-to-end scenarios: ingest, ask, sessions

use std::sync::Arc;

use async_trait::async_trait;
use askdocs::config::{AnswerConfig, ChunkingConfig, IngestionConfig, RetrievalConfig};
use askdocs::error::{Error, Result};
use askdocs::generation::AnswerComposer;
use askdocs::ingestion::IngestPipeline;
use askdocs::providers::{CompletionProvider, EmbeddingProvider};
use askdocs::retrieval::Retriever;
use askdocs::sessions::SessionStore;
use askdocs::storage::Database;
use askdocs::types::chat::ChatMessage;

/// Deterministic embedder: a few marker words map to fixed directions, so
/// relevance is fully predictable without a model service.
struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        if lower.contains("france") || lower.contains("paris") {
            Ok(vec![1.0, 0.0, 0.0])
        } else if lower.contains("sentence") {
            Ok(vec![0.0, 1.0, 0.0])
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

struct CannedLlm;

#[async_trait]
impl CompletionProvider for CannedLlm {
    async fn complete(&self, _system_prompt: &str, user_prompt: &str) -> Result<String> {
        // Echo grounded content the way a well-behaved model would
        if user_prompt.contains("Paris") {
            Ok("According to france.txt, the capital of France is Paris.".to_string())
        } else {
            Ok("Not found in documents.".to_string())
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "test-model"
    }
}

struct Harness {
    db: Database,
    pipeline: IngestPipeline,
    composer: AnswerComposer,
    sessions: SessionStore,
}

fn harness(chunking: ChunkingConfig) -> Harness {
    let db = Database::in_memory().unwrap();
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(KeywordEmbedder);
    let llm: Arc<dyn CompletionProvider> = Arc::new(CannedLlm);

    let pipeline = IngestPipeline::new(
        &IngestionConfig::default(),
        &chunking,
        embedder.clone(),
        db.clone(),
    );
    let retriever = Retriever::new(&RetrievalConfig::default(), embedder, db.clone());
    let composer = AnswerComposer::new(&AnswerConfig::default(), retriever, llm, db.clone());
    let sessions = SessionStore::new(db.clone());

    Harness {
        db,
        pipeline,
        composer,
        sessions,
    }
}

#[tokio::test]
async fn small_cap_splits_three_sentences_into_two_covering_chunks() {
    let h = harness(ChunkingConfig {
        min_tokens: 0,
        max_tokens: 8,
        overlap_tokens: 0,
    });

    let receipt = h
        .pipeline
        .ingest("alice", "tiny.txt", b"Sentence one. Sentence two. Sentence three.")
        .await
        .unwrap();
    assert_eq!(receipt.chunk_count, 2);

    let hits = h
        .db
        .nearest_chunks("alice", &[0.0, 1.0, 0.0], 10, None)
        .unwrap();
    let all: String = hits
        .iter()
        .map(|hit| hit.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    for sentence in ["Sentence one.", "Sentence two.", "Sentence three."] {
        assert!(all.contains(sentence), "missing: {}", sentence);
    }
}

#[tokio::test]
async fn irrelevant_question_fails_with_the_relevance_message() {
    let h = harness(ChunkingConfig::default());
    h.pipeline
        .ingest("alice", "france.txt", b"The capital of France is Paris.")
        .await
        .unwrap();

    let err = h
        .composer
        .answer("alice", "qwerty gibberish xyzzy", &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoRelevantContent));
    assert!(err.to_string().starts_with("No sufficiently relevant content"));
}

#[tokio::test]
async fn question_with_no_uploads_fails_differently_than_irrelevance() {
    let h = harness(ChunkingConfig::default());
    let err = h
        .composer
        .answer("alice", "What is the capital of France?", &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoDocuments));
}

#[tokio::test]
async fn paris_question_is_answered_with_the_uploaded_source() {
    let h = harness(ChunkingConfig::default());
    h.pipeline
        .ingest("alice", "france.txt", b"The capital of France is Paris.")
        .await
        .unwrap();

    let answer = h
        .composer
        .answer("alice", "What is the capital of France?", &[], None)
        .await
        .unwrap();

    assert!(answer.answer.contains("Paris"));
    assert!(!answer.sources.is_empty());
    assert_eq!(answer.sources[0].document_name, "france.txt");
    // Every returned source passed the relevance threshold
    assert!(answer.sources.iter().all(|s| s.similarity >= 0.25));
}

#[tokio::test]
async fn retrieval_never_reads_another_users_documents() {
    let h = harness(ChunkingConfig::default());
    h.pipeline
        .ingest("bob", "france.txt", b"The capital of France is Paris.")
        .await
        .unwrap();
    // Alice owns an unrelated document, so she gets a relevance failure
    // rather than Bob's content.
    h.pipeline
        .ingest("alice", "notes.txt", b"Completely unrelated notes here.")
        .await
        .unwrap();

    let err = h
        .composer
        .answer("alice", "What is the capital of France?", &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoRelevantContent));
}

#[tokio::test]
async fn scoped_ask_against_an_unowned_document_is_denied() {
    let h = harness(ChunkingConfig::default());
    let receipt = h
        .pipeline
        .ingest("bob", "france.txt", b"The capital of France is Paris.")
        .await
        .unwrap();
    h.pipeline
        .ingest("alice", "mine.txt", b"My own notes about France and Paris.")
        .await
        .unwrap();

    let err = h
        .composer
        .answer(
            "alice",
            "What is the capital of France?",
            &[],
            Some(&receipt.document_id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFoundOrUnauthorized(_)));
}

fn message(question: &str) -> ChatMessage {
    ChatMessage {
        question: question.to_string(),
        answer: "answer".to_string(),
        sources: Vec::new(),
        timestamp: "2026-01-01T00:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn resaving_a_session_replaces_its_messages() {
    let h = harness(ChunkingConfig::default());

    let id = h
        .sessions
        .save("alice", "Trip planning", &[message("q1")], None)
        .unwrap();

    let two = vec![message("q1"), message("q2")];
    h.sessions
        .save("alice", "Trip planning", &two, Some(&id))
        .unwrap();

    let session = h.sessions.get("alice", &id).unwrap();
    assert_eq!(session.messages.len(), 2);
}

#[tokio::test]
async fn sessions_of_other_users_are_invisible_and_immutable() {
    let h = harness(ChunkingConfig::default());
    let id = h
        .sessions
        .save("alice", "Private", &[message("secret")], None)
        .unwrap();

    assert!(matches!(
        h.sessions.get("bob", &id).unwrap_err(),
        Error::NotFoundOrUnauthorized(_)
    ));
    assert!(matches!(
        h.sessions.delete("bob", &id).unwrap_err(),
        Error::NotFoundOrUnauthorized(_)
    ));
    assert_eq!(h.sessions.get("alice", &id).unwrap().messages.len(), 1);
}
