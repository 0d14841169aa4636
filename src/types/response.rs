//! Response types for the HTTP API

use serde::{Deserialize, Serialize};

use super::chat::SourceRef;
use super::document::DocumentSummary;

/// A composed answer with the sources it was grounded in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    /// Sources in the order presented to the model, aligned with the
    /// `[Source i]` labels in the prompt
    pub sources: Vec<SourceRef>,
}

/// Response body for `POST /api/ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub success: bool,
    pub answer: String,
    pub sources: Vec<SourceRef>,
}

impl From<Answer> for AskResponse {
    fn from(answer: Answer) -> Self {
        Self {
            success: true,
            answer: answer.answer,
            sources: answer.sources,
        }
    }
}

/// Response body for `POST /api/documents`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub document_id: String,
    pub document_name: String,
    pub chunks_created: usize,
}

/// Response body for `GET /api/documents`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
}

/// Response body for `POST /api/sessions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSessionResponse {
    pub success: bool,
    pub session_id: String,
}

/// Response body for deletions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Health of one external dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// "ok" or "error"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Response body for `GET /api/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub database: ComponentStatus,
    pub model: ComponentStatus,
    /// "healthy" when both dependencies respond, "degraded" when one does,
    /// "unhealthy" when neither does
    pub overall: String,
    pub timestamp: String,
}
