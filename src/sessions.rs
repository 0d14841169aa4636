//! Chat session persistence
//!
//! Every operation verifies the session belongs to the caller before acting.
//! A session owned by someone else is indistinguishable from a missing one.

use crate::error::{Error, Result};
use crate::storage::{Database, SessionRow};
use crate::types::chat::{ChatMessage, SessionData};

/// Saves and replays conversations for their owner
#[derive(Clone)]
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Save a conversation. Without `session_id` a new session is created;
    /// with it, the title and the entire message list are replaced; there
    /// is no append or merge. Returns the session id.
    pub fn save(
        &self,
        owner_id: &str,
        title: &str,
        messages: &[ChatMessage],
        session_id: Option<&str>,
    ) -> Result<String> {
        let messages_json = serde_json::to_string(messages)?;

        match session_id {
            Some(id) => {
                if !self.db.update_session(owner_id, id, title, &messages_json)? {
                    return Err(Error::NotFoundOrUnauthorized("Chat session"));
                }
                Ok(id.to_string())
            }
            None => self.db.insert_session(owner_id, title, &messages_json),
        }
    }

    /// The caller's sessions, newest first
    pub fn list(&self, owner_id: &str) -> Result<Vec<SessionData>> {
        let rows = self.db.list_sessions(owner_id)?;
        rows.into_iter().map(row_to_data).collect()
    }

    /// One owned session by id
    pub fn get(&self, owner_id: &str, session_id: &str) -> Result<SessionData> {
        match self.db.get_session(owner_id, session_id)? {
            Some(row) => row_to_data(row),
            None => Err(Error::NotFoundOrUnauthorized("Chat session")),
        }
    }

    /// Delete one owned session
    pub fn delete(&self, owner_id: &str, session_id: &str) -> Result<()> {
        if !self.db.delete_session(owner_id, session_id)? {
            return Err(Error::NotFoundOrUnauthorized("Chat session"));
        }
        Ok(())
    }
}

fn row_to_data(row: SessionRow) -> Result<SessionData> {
    let messages: Vec<ChatMessage> = serde_json::from_str(&row.messages_json)
        .map_err(|e| Error::Persistence(format!("corrupt session messages: {}", e)))?;
    Ok(SessionData {
        id: row.id,
        title: row.title,
        messages,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
