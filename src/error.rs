//! Error types shared across the crate

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Result type alias for askdocs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while ingesting documents or answering questions
#[derive(Error, Debug)]
pub enum Error {
    /// No valid caller identity was supplied
    #[error("Unauthorized. Please sign in.")]
    Unauthorized,

    /// Rejected input: empty question, disallowed file type, oversize file
    #[error("{0}")]
    Validation(String),

    /// The requested resource does not exist or belongs to another user.
    /// The two cases are merged so callers cannot probe for other users' data.
    #[error("{0} not found or unauthorized.")]
    NotFoundOrUnauthorized(&'static str),

    /// The caller has not uploaded any documents yet
    #[error("No documents uploaded yet. Please upload documents first.")]
    NoDocuments,

    /// Documents exist but no chunk met the similarity threshold
    #[error("No sufficiently relevant content found in your documents. Try rephrasing the question.")]
    NoRelevantContent,

    /// Embedding or completion service call failed or returned no data
    #[error("model provider error: {0}")]
    Provider(String),

    /// A query or transaction against the store failed
    #[error("storage error: {0}")]
    Persistence(String),

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Anything that should never surface to a caller as-is
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Persistence(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Provider(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(format!("serialization failed: {}", e))
    }
}

#[derive(serde::Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFoundOrUnauthorized(_) => StatusCode::NOT_FOUND,
            Error::NoDocuments | Error::NoRelevantContent => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Provider(_) => StatusCode::BAD_GATEWAY,
            Error::Persistence(_) | Error::Config(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
