use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::prompt::PromptStyle;
use crate::rag::ChunkerConfig;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
const CONFIG_PATH_ENV: &str = "CONTEXTO_CONFIG_PATH";
const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// UTF-8 document used as retrieval context.
    pub context_file: PathBuf,
    /// Transcript written by the `salvar` command, overwritten on each save.
    pub transcript_file: PathBuf,
    pub log_dir: PathBuf,
    pub chunking: ChunkerConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API root, without the `/v1` suffix.
    pub base_url: String,
    pub model: String,
    pub embedding_model: String,
    pub temperature: f64,
    pub max_tokens: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub style: PromptStyle,
    /// Print and persist per-turn response times.
    pub show_timing: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            context_file: PathBuf::from("contextoAberto.txt"),
            transcript_file: PathBuf::from("historico_chat.txt"),
            log_dir: PathBuf::from("logs"),
            chunking: ChunkerConfig::default(),
            retrieval: RetrievalConfig::default(),
            llm: LlmConfig::default(),
            prompt: PromptConfig::default(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            style: PromptStyle::Conversational,
            show_timing: true,
        }
    }
}

impl AppConfig {
    /// Loads the configuration from `CONTEXTO_CONFIG_PATH` or `config.toml`.
    ///
    /// A missing file means defaults; a file that exists but does not parse is
    /// a startup failure.
    pub fn load() -> Result<Self, AppError> {
        let path = env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&raw)
            .map_err(|e| AppError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// The API key is read from the environment only, never from the file.
    pub fn api_key(&self) -> Result<String, AppError> {
        match env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AppError::MissingApiKey(API_KEY_ENV)),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.context_file.exists() {
            return Err(AppError::ContextFileMissing(self.context_file.clone()));
        }
        if self.chunking.chunk_size == 0 {
            return Err(AppError::Config("chunk_size must be positive".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(AppError::Config(
                "chunk_overlap must be smaller than chunk_size".to_string(),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(AppError::Config("top_k must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load_from(Path::new("does-not-exist.toml"))
            .expect("defaults should load");
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert!(config.prompt.show_timing);
    }

    #[test]
    fn partial_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "context_file = \"docs.txt\"\n\n[retrieval]\ntop_k = 5\n\n[prompt]\nstyle = \"survey_json\""
        )
        .expect("write config");

        let config = AppConfig::load_from(file.path()).expect("config should parse");
        assert_eq!(config.context_file, PathBuf::from("docs.txt"));
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.prompt.style, PromptStyle::SurveyJson);
        // Untouched sections keep defaults.
        assert_eq!(config.chunking.chunk_overlap, 200);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "retrieval = \"not a table\"").expect("write config");

        let result = AppConfig::load_from(file.path());
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_overlap_at_least_chunk_size() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let mut config = AppConfig::default();
        config.context_file = file.path().to_path_buf();
        config.chunking.chunk_size = 100;
        config.chunking.chunk_overlap = 100;

        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_missing_context_file() {
        let mut config = AppConfig::default();
        config.context_file = PathBuf::from("no-such-context.txt");

        assert!(matches!(
            config.validate(),
            Err(AppError::ContextFileMissing(_))
        ));
    }
}
