//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Converts text into fixed-length float vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple texts; the output is index-aligned with the input.
    /// A failure aborts the whole batch; callers must not assume partial
    /// success.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Embedding dimensionality `D` of every produced vector
    fn dimensions(&self) -> usize;

    /// Check that the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
