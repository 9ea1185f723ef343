use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::errors::AppError;

/// One question/answer turn, appended in order and never mutated.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub question: String,
    pub response: String,
    pub elapsed: Option<Duration>,
}

/// In-memory interaction log, persisted to a flat file on request.
#[derive(Debug, Default)]
pub struct TranscriptLog {
    interactions: Vec<Interaction>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, question: String, response: String, elapsed: Option<Duration>) {
        self.interactions.push(Interaction {
            question,
            response,
            elapsed,
        });
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Overwrites `path` with the full transcript, one numbered block per
    /// interaction.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let mut out = String::from("=== Histórico do Chat ===\n\n");
        for (i, interaction) in self.interactions.iter().enumerate() {
            out.push_str(&format!("--- Interação {} ---\n", i + 1));
            out.push_str(&format!("Você: {}\n", interaction.question));
            out.push_str(&format!("Assistente: {}\n", interaction.response));
            if let Some(elapsed) = interaction.elapsed {
                out.push_str(&format!(
                    "Tempo de Resposta: {:.2} segundos\n",
                    elapsed.as_secs_f64()
                ));
            }
            out.push('\n');
        }

        fs::write(path, out).map_err(AppError::transcript)
    }
}
