use crate::core::errors::AppError;
use crate::llm::EmbeddingProvider;
use crate::vector_math::rank_descending_by_cosine;

use super::chunker::TextChunk;

/// In-memory vector index over the document chunks.
///
/// Built once at startup; chunks and vectors are never mutated afterwards.
pub struct EmbeddingIndex {
    chunks: Vec<TextChunk>,
    vectors: Vec<Vec<f32>>,
}

/// A chunk returned from a similarity search.
#[derive(Debug, Clone)]
pub struct ChunkMatch {
    pub chunk: TextChunk,
    /// Cosine similarity (higher = closer).
    pub score: f32,
}

impl EmbeddingIndex {
    /// Embeds every chunk and stores the vectors for lookup.
    ///
    /// An embedding failure propagates as a retrieval error.
    pub async fn build(
        chunks: Vec<TextChunk>,
        embedder: &dyn EmbeddingProvider,
        model_id: &str,
    ) -> Result<Self, AppError> {
        if chunks.is_empty() {
            return Ok(Self {
                chunks,
                vectors: Vec::new(),
            });
        }

        let inputs: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed(&inputs, model_id).await?;

        if vectors.len() != chunks.len() {
            return Err(AppError::Retrieval(format!(
                "embedded {} chunks but got {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        Ok(Self { chunks, vectors })
    }

    /// Returns the `k` chunks most similar to the query vector, best first.
    ///
    /// Ties keep original chunk order; `k` larger than the index returns
    /// everything.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<ChunkMatch>, AppError> {
        if self.vectors.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut ranked = rank_descending_by_cosine(query_embedding, &self.vectors)?;
        ranked.truncate(k);

        Ok(ranked
            .into_iter()
            .map(|(idx, score)| ChunkMatch {
                chunk: self.chunks[idx].clone(),
                score,
            })
            .collect())
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
