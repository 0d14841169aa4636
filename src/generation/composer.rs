//! Grounded answer composition

use std::sync::Arc;

use crate::config::AnswerConfig;
use crate::error::{Error, Result};
use crate::providers::CompletionProvider;
use crate::retrieval::Retriever;
use crate::storage::Database;
use crate::types::chat::SourceRef;
use crate::types::request::HistoryTurn;
use crate::types::response::Answer;

/// Answers questions from retrieved document context
pub struct AnswerComposer {
    retriever: Retriever,
    llm: Arc<dyn CompletionProvider>,
    db: Database,
    history_window: usize,
}

impl AnswerComposer {
    pub fn new(
        config: &AnswerConfig,
        retriever: Retriever,
        llm: Arc<dyn CompletionProvider>,
        db: Database,
    ) -> Self {
        Self {
            retriever,
            llm,
            db,
            history_window: config.history_window,
        }
    }

    /// Compose a grounded answer for `question`.
    ///
    /// Fails fast on an empty question, then on a caller with no documents
    /// (before any embedding call), then on an empty relevant set. The
    /// returned sources mirror the `[Source i]` labels in the prompt, in
    /// retrieval order.
    pub async fn answer(
        &self,
        owner_id: &str,
        question: &str,
        history: &[HistoryTurn],
        document_id: Option<&str>,
    ) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(Error::Validation("Question cannot be empty".to_string()));
        }

        if self.db.count_documents(owner_id)? == 0 {
            return Err(Error::NoDocuments);
        }

        let retrieved = self
            .retriever
            .retrieve(owner_id, question, document_id)
            .await?;
        if retrieved.is_empty() {
            return Err(Error::NoRelevantContent);
        }

        let user_prompt = super::prompt::PromptBuilder::build_user_prompt(
            question,
            &retrieved,
            history,
            self.history_window,
        );

        let answer = self
            .llm
            .complete(super::prompt::SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "completion failed while answering");
                e
            })?;

        let sources: Vec<SourceRef> = retrieved
            .into_iter()
            .map(|chunk| SourceRef {
                document_name: chunk.document_name,
                chunk_text: chunk.content,
                similarity: chunk.similarity,
            })
            .collect();

        tracing::info!(sources = sources.len(), "composed answer");

        Ok(Answer { answer, sources })
    }
}
