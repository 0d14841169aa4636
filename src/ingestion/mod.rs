//! Document ingestion: extraction, chunking, and the upload pipeline

pub mod chunker;
pub mod extract;
pub mod pipeline;

pub use chunker::{approximate_tokens, ChunkPiece, TextChunker};
pub use extract::SourceFormat;
pub use pipeline::{IngestPipeline, IngestReceipt};
