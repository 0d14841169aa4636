//! Configuration for the document Q&A service

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Embedding/completion provider configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Ingestion limits
    #[serde(default)]
    pub ingestion: IngestionConfig,
    /// Text chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Answer composition configuration
    #[serde(default)]
    pub answers: AnswerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .map_err(|e| Error::Config(format!("cannot read {}: {}", p.display(), e)))?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Config(format!("cannot parse {}: {}", p.display(), e)))
            }
            None => Ok(Self::default()),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum HTTP request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_body_size: 25 * 1024 * 1024,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("askdocs.db"),
        }
    }
}

/// Embedding/completion provider configuration (OpenAI-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the API, e.g. "https://api.openai.com/v1"
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Embedding model name
    pub embed_model: String,
    /// Embedding dimensionality produced by `embed_model`
    pub dimensions: usize,
    /// Chat completion model name
    pub chat_model: String,
    /// Sampling temperature for answer generation
    pub temperature: f32,
    /// Maximum tokens in a generated answer
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            embed_model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            chat_model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 500,
            timeout_secs: 60,
        }
    }
}

/// Ingestion limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Maximum accepted file size in bytes
    pub max_file_size: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Minimum tokens per chunk. Accepted for tuning symmetry but does not
    /// force early chunk closure; chunks only close when `max_tokens` would
    /// be exceeded.
    pub min_tokens: usize,
    /// Maximum tokens per chunk
    pub max_tokens: usize,
    /// Tokens of whole-sentence overlap carried into the next chunk
    pub overlap_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_tokens: 500,
            max_tokens: 800,
            overlap_tokens: 100,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of nearest chunks to fetch before relevance filtering
    pub top_k: usize,
    /// Cosine distance at or above which a candidate is discarded.
    /// The useful value depends on the corpus and the embedding model.
    pub max_distance: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            max_distance: 0.75,
        }
    }
}

/// Answer composition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// Number of trailing (question, answer) pairs included in the prompt
    pub history_window: usize,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self { history_window: 3 }
    }
}
