//! Chat session types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One source a generated answer was grounded in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Display name of the document the chunk came from
    pub document_name: String,
    /// Original chunk text as presented to the model
    pub chunk_text: String,
    /// Similarity score, `round((1 - distance) * 100) / 100`
    pub similarity: f32,
}

/// One question/answer exchange within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceRef>,
    /// Client-supplied timestamp, kept as an opaque string
    pub timestamp: String,
}

/// A saved conversation, as returned to its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
