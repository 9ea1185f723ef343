use std::sync::Arc;

use crate::core::errors::AppError;
use crate::llm::EmbeddingProvider;

use super::index::{ChunkMatch, EmbeddingIndex};

/// Embeds a query and pulls the top-k chunks from the index.
///
/// Stateless per call: no caching, no retries.
pub struct Retriever {
    index: EmbeddingIndex,
    embedder: Arc<dyn EmbeddingProvider>,
    embedding_model: String,
    top_k: usize,
}

impl Retriever {
    pub fn new(
        index: EmbeddingIndex,
        embedder: Arc<dyn EmbeddingProvider>,
        embedding_model: String,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            embedding_model,
            top_k,
        }
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<ChunkMatch>, AppError> {
        let embeddings = self
            .embedder
            .embed(&[query.to_string()], &self.embedding_model)
            .await?;
        let query_embedding = embeddings
            .first()
            .ok_or_else(|| AppError::Retrieval("no embedding returned for query".to_string()))?;

        self.index.search(query_embedding, self.top_k)
    }

    /// Retrieved chunk texts joined by a blank line, in similarity order.
    pub async fn context(&self, query: &str) -> Result<String, AppError> {
        let matches = self.retrieve(query).await?;
        Ok(matches
            .iter()
            .map(|m| m.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::rag::TextChunk;

    use super::*;

    /// Maps known texts to fixed vectors so retrieval is deterministic.
    struct LookupEmbedder;

    #[async_trait]
    impl EmbeddingProvider for LookupEmbedder {
        async fn embed(
            &self,
            inputs: &[String],
            _model_id: &str,
        ) -> Result<Vec<Vec<f32>>, AppError> {
            inputs
                .iter()
                .map(|text| match text.as_str() {
                    "o céu é azul" | "qual a cor do céu?" => Ok(vec![1.0, 0.0]),
                    "o mar é fundo" => Ok(vec![0.6, 0.4]),
                    "dois mais dois" => Ok(vec![0.0, 1.0]),
                    other => Err(AppError::Retrieval(format!("unknown text: {}", other))),
                })
                .collect()
        }
    }

    fn make_chunk(text: &str, index: usize) -> TextChunk {
        TextChunk {
            text: text.to_string(),
            source: "doc".to_string(),
            start_offset: 0,
            chunk_index: index,
        }
    }

    async fn make_retriever(top_k: usize) -> Retriever {
        let chunks = vec![
            make_chunk("o céu é azul", 0),
            make_chunk("o mar é fundo", 1),
            make_chunk("dois mais dois", 2),
        ];
        let index = EmbeddingIndex::build(chunks, &LookupEmbedder, "test-model")
            .await
            .expect("index should build");
        Retriever::new(index, Arc::new(LookupEmbedder), "test-model".to_string(), top_k)
    }

    #[tokio::test]
    async fn retrieve_returns_top_k_most_similar() {
        let retriever = make_retriever(2).await;
        let matches = retriever
            .retrieve("qual a cor do céu?")
            .await
            .expect("retrieve should work");

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].chunk.text, "o céu é azul");
        assert_eq!(matches[1].chunk.text, "o mar é fundo");
    }

    #[tokio::test]
    async fn context_joins_chunks_with_blank_lines() {
        let retriever = make_retriever(2).await;
        let context = retriever
            .context("qual a cor do céu?")
            .await
            .expect("context should build");

        assert_eq!(context, "o céu é azul\n\no mar é fundo");
    }

    #[tokio::test]
    async fn unknown_query_propagates_the_embedding_error() {
        let retriever = make_retriever(2).await;
        let result = retriever.context("pergunta inédita").await;
        assert!(matches!(result, Err(AppError::Retrieval(_))));
    }
}
