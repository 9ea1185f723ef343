mod config;
mod core;
mod history;
mod llm;
mod logging;
mod prompt;
mod rag;
mod session;
mod vector_math;

use std::fs;
use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::llm::GroqProvider;
use crate::rag::{Chunker, EmbeddingIndex, Retriever};
use crate::session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init(&config.log_dir);

    let api_key = config.api_key()?;
    config.validate()?;

    println!("Carregando e processando o documento de contexto...");

    let document = fs::read_to_string(&config.context_file).map_err(|e| {
        crate::core::errors::AppError::Document(format!(
            "failed to read {}: {}",
            config.context_file.display(),
            e
        ))
    })?;

    let source = config
        .context_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.context_file.display().to_string());

    let chunker = Chunker::new(config.chunking.clone());
    let chunks = chunker.split(&document, &source);
    tracing::info!(chunks = chunks.len(), "context document split");

    let provider = Arc::new(GroqProvider::new(config.llm.base_url.clone(), api_key));

    let index = EmbeddingIndex::build(chunks, provider.as_ref(), &config.llm.embedding_model)
        .await
        .context("Failed to index the context document")?;
    tracing::info!(chunks = index.len(), "embedding index built");

    println!("Documento processado com sucesso!");

    let retriever = Retriever::new(
        index,
        provider.clone(),
        config.llm.embedding_model.clone(),
        config.retrieval.top_k,
    );

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout();
    let session = Session::new(config, retriever, provider, stdin, stdout);
    session.run().await.context("Chat session failed")?;

    Ok(())
}
