use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("API key not configured: set the {0} environment variable")]
    MissingApiKey(&'static str),
    #[error("context file not found: {0}")]
    ContextFileMissing(PathBuf),
    #[error("document processing failed: {0}")]
    Document(String),
    #[error("retrieval unavailable: {0}")]
    Retrieval(String),
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("transcript write failed: {0}")]
    Transcript(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn retrieval<E: std::fmt::Display>(err: E) -> Self {
        AppError::Retrieval(err.to_string())
    }

    pub fn generation<E: std::fmt::Display>(err: E) -> Self {
        AppError::Generation(err.to_string())
    }

    pub fn transcript<E: std::fmt::Display>(err: E) -> Self {
        AppError::Transcript(err.to_string())
    }
}
