//! Shared data types

pub mod chat;
pub mod document;
pub mod request;
pub mod response;

pub use chat::{ChatMessage, SessionData, SourceRef};
pub use document::{Document, DocumentSummary};
pub use response::{Answer, AskResponse, UploadResponse};
