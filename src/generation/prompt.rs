//! Prompt assembly for grounded answers

use crate::retrieval::RetrievedChunk;
use crate::types::request::HistoryTurn;

/// Fixed instruction prompt. Answers must come from the supplied context
/// only; the literal fallback string makes "answer absent" detectable.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions based ONLY on the provided context from documents.

IMPORTANT RULES:
1. Answer ONLY using information from the provided context
2. If the answer is not found in the context, respond with \"Not found in documents.\"
3. Cite which document(s) you used to answer the question
4. Be concise and accurate
5. Do not make up information or use external knowledge";

/// Builds the user prompt from retrieved context and recent conversation
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render retrieved chunks as labeled sections, nearest first. The
    /// `Source i` labels are 1-based and stay index-aligned with the source
    /// list returned to the caller.
    pub fn build_context(chunks: &[RetrievedChunk]) -> String {
        chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                format!("[Source {}: {}]\n{}", i + 1, chunk.document_name, chunk.content)
            })
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }

    /// Render at most the trailing `window` turns as labeled Q/A pairs,
    /// giving the model short-term memory for follow-up references.
    pub fn build_history(history: &[HistoryTurn], window: usize) -> String {
        let start = history.len().saturating_sub(window);
        history[start..]
            .iter()
            .enumerate()
            .map(|(i, turn)| format!("Q{}: {}\nA{}: {}", i + 1, turn.question, i + 1, turn.answer))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Assemble the full user prompt
    pub fn build_user_prompt(
        question: &str,
        chunks: &[RetrievedChunk],
        history: &[HistoryTurn],
        window: usize,
    ) -> String {
        let context = Self::build_context(chunks);
        let mut prompt = String::new();

        if !history.is_empty() && window > 0 {
            prompt.push_str("Recent conversation:\n\n");
            prompt.push_str(&Self::build_history(history, window));
            prompt.push_str("\n\n---\n\n");
        }

        prompt.push_str("Context from documents:\n\n");
        prompt.push_str(&context);
        prompt.push_str("\n\n---\n\nQuestion: ");
        prompt.push_str(question);
        prompt.push_str("\n\nPlease answer the question based on the context above.");
        prompt
    }
}
