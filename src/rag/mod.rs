//! Retrieval pipeline.
//!
//! - `Chunker`: splits the context document into overlapping chunks
//! - `EmbeddingIndex`: embeds chunks and answers top-k similarity lookups
//! - `Retriever`: embeds a query and builds the context string for the prompt

mod chunker;
mod index;
mod retriever;

pub use chunker::{Chunker, ChunkerConfig, TextChunk};
pub use index::{ChunkMatch, EmbeddingIndex};
pub use retriever::Retriever;
