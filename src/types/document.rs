//! Document types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored document. Immutable after creation; deleting it cascades to its
/// chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document id (UUID)
    pub id: String,
    /// Opaque id of the uploading user
    pub owner_id: String,
    /// Display name (the uploaded filename)
    pub name: String,
    /// Full extracted text
    pub content: String,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

/// Document listing entry returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    /// Number of chunks created during ingestion
    pub chunk_count: usize,
}
