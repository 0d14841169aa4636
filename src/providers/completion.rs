//! Completion provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Generates answer text from an instruction prompt and a user prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run a chat completion and return the generated text
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Check that the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// The model used for generation
    fn model(&self) -> &str;
}
