//! SQLite persistence for documents, chunks, and chat sessions
//!
//! One `Connection` behind a mutex, WAL mode, migrations applied at open.
//! Embeddings are stored as little-endian `f32` BLOBs and ranked by exact
//! cosine distance inside this layer.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::ingestion::chunker::ChunkPiece;
use crate::types::document::{Document, DocumentSummary};

/// A chunk returned from the nearest-neighbor query
#[derive(Debug, Clone)]
pub struct ChunkHit {
    pub chunk_id: String,
    pub document_id: String,
    pub content: String,
    /// Cosine distance to the query vector (0 = identical direction)
    pub distance: f32,
}

/// A chat session row, messages still serialized
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: String,
    pub title: String,
    pub messages_json: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Handle to the SQLite store
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Create or open the database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| Error::Persistence(format!("failed to open database: {}", e)))?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Persistence(format!("failed to open in-memory database: {}", e)))?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;

            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                content TEXT NOT NULL,
                uploaded_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_documents_owner ON documents(owner_id);

            CREATE TABLE IF NOT EXISTS chunks (
                id TEXT PRIMARY KEY,
                document_id TEXT NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL,
                token_count INTEGER NOT NULL,
                chunk_index INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_document ON chunks(document_id);

            CREATE TABLE IF NOT EXISTS chat_sessions (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                messages TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_chat_sessions_owner ON chat_sessions(owner_id);
            "#,
        )
        .map_err(|e| Error::Persistence(format!("failed to run migrations: {}", e)))?;

        tracing::debug!("database migrations complete");
        Ok(())
    }

    /// Liveness probe for the status endpoint
    pub fn health_check(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| Error::Persistence(format!("health probe failed: {}", e)))
    }

    // ==================== Documents & chunks ====================

    /// Insert a document together with all its chunks in one transaction.
    /// Either every row lands or none do; readers never observe a document
    /// without its full chunk set.
    pub fn insert_document_with_chunks(
        &self,
        document: &Document,
        chunks: &[ChunkPiece],
        embeddings: &[Vec<f32>],
        dimensions: usize,
    ) -> Result<()> {
        if chunks.len() != embeddings.len() {
            return Err(Error::Internal(format!(
                "chunk/embedding count mismatch: {} vs {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::Persistence(format!("failed to begin transaction: {}", e)))?;

        tx.execute(
            "INSERT INTO documents (id, owner_id, name, content, uploaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                document.id,
                document.owner_id,
                document.name,
                document.content,
                document.uploaded_at,
            ],
        )
        .map_err(|e| Error::Persistence(format!("failed to insert document: {}", e)))?;

        let now = Utc::now();
        for (index, (chunk, embedding)) in chunks.iter().zip(embeddings).enumerate() {
            if embedding.len() != dimensions {
                return Err(Error::Provider(format!(
                    "embedding for chunk {} has {} components, expected {}",
                    index,
                    embedding.len(),
                    dimensions
                )));
            }

            tx.execute(
                "INSERT INTO chunks (id, document_id, content, embedding, token_count, chunk_index, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    uuid::Uuid::new_v4().to_string(),
                    document.id,
                    chunk.content,
                    embedding_to_bytes(embedding),
                    chunk.token_count as i64,
                    index as i64,
                    now,
                ],
            )
            .map_err(|e| Error::Persistence(format!("failed to insert chunk {}: {}", index, e)))?;
        }

        tx.commit()
            .map_err(|e| Error::Persistence(format!("failed to commit ingestion: {}", e)))
    }

    /// Number of documents the user owns
    pub fn count_documents(&self, owner_id: &str) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// The user's documents, newest first, with chunk counts
    pub fn list_documents(&self, owner_id: &str) -> Result<Vec<DocumentSummary>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT d.id, d.name, d.uploaded_at, COUNT(c.id)
             FROM documents d
             LEFT JOIN chunks c ON c.document_id = d.id
             WHERE d.owner_id = ?1
             GROUP BY d.id
             ORDER BY d.uploaded_at DESC",
        )?;
        let rows = stmt.query_map(params![owner_id], |row| {
            Ok(DocumentSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                uploaded_at: row.get(2)?,
                chunk_count: row.get::<_, i64>(3)? as usize,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Owner of a document, if it exists
    pub fn document_owner(&self, document_id: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT owner_id FROM documents WHERE id = ?1",
            params![document_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(Into::into)
    }

    /// Delete a document the user owns; chunks cascade. Returns false when
    /// no owned row matched.
    pub fn delete_document(&self, owner_id: &str, document_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let affected = conn.execute(
            "DELETE FROM documents WHERE id = ?1 AND owner_id = ?2",
            params![document_id, owner_id],
        )?;
        Ok(affected > 0)
    }

    /// Display names for a set of document ids, one batch lookup
    pub fn document_names(&self, ids: &[String]) -> Result<HashMap<String, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let conn = self.conn.lock();
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, name FROM documents WHERE id IN ({})",
            placeholders
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(ids), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        rows.collect::<rusqlite::Result<HashMap<_, _>>>()
            .map_err(Into::into)
    }

    /// The `k` chunks nearest to `query` by cosine distance, ascending.
    ///
    /// Scoped to one document when `document_id` is given (the caller has
    /// already verified ownership), otherwise to every document the user
    /// owns. Exact brute-force ranking over the candidate set.
    pub fn nearest_chunks(
        &self,
        owner_id: &str,
        query: &[f32],
        k: usize,
        document_id: Option<&str>,
    ) -> Result<Vec<ChunkHit>> {
        let conn = self.conn.lock();

        let (sql, key) = match document_id {
            Some(doc_id) => (
                "SELECT c.id, c.document_id, c.content, c.embedding
                 FROM chunks c
                 WHERE c.document_id = ?1",
                doc_id,
            ),
            None => (
                "SELECT c.id, c.document_id, c.content, c.embedding
                 FROM chunks c
                 INNER JOIN documents d ON c.document_id = d.id
                 WHERE d.owner_id = ?1",
                owner_id,
            ),
        };

        let mut hits: Vec<ChunkHit> = Vec::new();
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(params![key])?;
        while let Some(row) = rows.next()? {
            let chunk_id: String = row.get(0)?;
            let embedding = bytes_to_embedding(&row.get::<_, Vec<u8>>(3)?);
            if embedding.len() != query.len() {
                tracing::warn!(%chunk_id, "skipping chunk with mismatched embedding dimensionality");
                continue;
            }
            hits.push(ChunkHit {
                chunk_id,
                document_id: row.get(1)?,
                content: row.get(2)?,
                distance: 1.0 - cosine_similarity(query, &embedding),
            });
        }

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }

    // ==================== Chat sessions ====================

    /// Create a new session, returning its id
    pub fn insert_session(
        &self,
        owner_id: &str,
        title: &str,
        messages_json: &str,
    ) -> Result<String> {
        let conn = self.conn.lock();
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        conn.execute(
            "INSERT INTO chat_sessions (id, owner_id, title, messages, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, owner_id, title, messages_json, now, now],
        )?;
        Ok(id)
    }

    /// Replace the title and full message list of an owned session.
    /// Returns false when no owned row matched.
    pub fn update_session(
        &self,
        owner_id: &str,
        session_id: &str,
        title: &str,
        messages_json: &str,
    ) -> Result<bool> {
        let conn = self.conn.lock();
        let affected = conn.execute(
            "UPDATE chat_sessions
             SET title = ?1, messages = ?2, updated_at = ?3
             WHERE id = ?4 AND owner_id = ?5",
            params![title, messages_json, Utc::now(), session_id, owner_id],
        )?;
        Ok(affected > 0)
    }

    /// The user's sessions, newest first
    pub fn list_sessions(&self, owner_id: &str) -> Result<Vec<SessionRow>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, title, messages, created_at, updated_at
             FROM chat_sessions
             WHERE owner_id = ?1
             ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![owner_id], row_to_session)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// An owned session by id; absent and unowned are indistinguishable
    pub fn get_session(&self, owner_id: &str, session_id: &str) -> Result<Option<SessionRow>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, title, messages, created_at, updated_at
             FROM chat_sessions
             WHERE id = ?1 AND owner_id = ?2",
            params![session_id, owner_id],
            row_to_session,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Delete an owned session. Returns false when no owned row matched.
    pub fn delete_session(&self, owner_id: &str, session_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let affected = conn.execute(
            "DELETE FROM chat_sessions WHERE id = ?1 AND owner_id = ?2",
            params![session_id, owner_id],
        )?;
        Ok(affected > 0)
    }
}

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRow> {
    Ok(SessionRow {
        id: row.get(0)?,
        title: row.get(1)?,
        messages_json: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Serialize an embedding for BLOB storage
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Deserialize an embedding from BLOB bytes
fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
