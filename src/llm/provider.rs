use async_trait::async_trait;

use crate::core::errors::AppError;

use super::types::ChatRequest;

/// Remote text-generation endpoint. One prompt in, raw text out; failures
/// propagate to the caller and are never retried here.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// return the provider name (e.g. "groq")
    fn name(&self) -> &str;

    /// chat completion (non-streaming)
    async fn complete(&self, request: ChatRequest, model_id: &str) -> Result<String, AppError>;
}

/// Embedding endpoint used at index-build time and once per query.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// generate one embedding vector per input
    async fn embed(&self, inputs: &[String], model_id: &str)
        -> Result<Vec<Vec<f32>>, AppError>;
}
