//! Request types for the HTTP API

use serde::{Deserialize, Serialize};

use super::chat::ChatMessage;

/// One prior exchange supplied as conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub question: String,
    pub answer: String,
}

/// Request body for `POST /api/ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    pub question: String,
    /// Prior (question, answer) pairs of the conversation, oldest first
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
    /// Restrict retrieval to a single document (optional)
    #[serde(default)]
    pub document_id: Option<String>,
}

/// Request body for `POST /api/sessions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSessionRequest {
    pub title: String,
    pub messages: Vec<ChatMessage>,
    /// When set, fully replaces that session's title and messages
    #[serde(default)]
    pub session_id: Option<String>,
}
