//! askdocs: document Q&A with retrieval-augmented answers and cited sources
//!
//! Users upload documents; the service splits them into overlapping,
//! sentence-bounded chunks, embeds each chunk through an external model
//! provider, and answers questions by retrieving the nearest chunks by
//! cosine distance and asking a completion model to compose an answer
//! grounded in that context. Conversations can be saved and replayed.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod sessions;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use types::{Answer, ChatMessage, SessionData, SourceRef};
