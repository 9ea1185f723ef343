use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::core::errors::AppError;
use crate::history::TranscriptLog;
use crate::llm::{ChatRequest, CompletionProvider};
use crate::rag::Retriever;

const SEPARATOR_WIDTH: usize = 50;

/// Interactive read-eval loop over the retrieval pipeline.
///
/// Input and output are injected so tests can drive the loop with buffers.
/// Each command runs to completion before the next line is read; per-turn
/// failures are printed and the loop continues.
pub struct Session<R, W> {
    config: AppConfig,
    retriever: Retriever,
    completion: Arc<dyn CompletionProvider>,
    transcript: TranscriptLog,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        config: AppConfig,
        retriever: Retriever,
        completion: Arc<dyn CompletionProvider>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            config,
            retriever,
            completion,
            transcript: TranscriptLog::new(),
            input,
            output,
        }
    }

    /// Runs until `sair` or end of input. Only I/O errors on the injected
    /// streams abort the loop.
    pub async fn run(mut self) -> Result<(), AppError> {
        writeln!(self.output, "\n=== Chat Iniciado ===")?;
        writeln!(self.output, "Digite 'sair' para encerrar o chat")?;
        writeln!(self.output, "Digite 'salvar' para salvar a conversa")?;

        loop {
            write!(self.output, "\nVocê: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }

            match entry.to_lowercase().as_str() {
                "sair" => break,
                "salvar" => self.save_transcript()?,
                _ => self.handle_question(entry).await?,
            }
        }

        Ok(())
    }

    fn save_transcript(&mut self) -> Result<(), AppError> {
        match self.transcript.save(&self.config.transcript_file) {
            Ok(()) => {
                tracing::info!(
                    interactions = self.transcript.len(),
                    "transcript saved to {}",
                    self.config.transcript_file.display()
                );
                writeln!(
                    self.output,
                    "Conversa salva em '{}'",
                    self.config.transcript_file.display()
                )?;
            }
            Err(err) => {
                tracing::error!("transcript save failed: {}", err);
                writeln!(self.output, "Erro ao salvar o histórico: {}", err)?;
            }
        }
        Ok(())
    }

    async fn handle_question(&mut self, question: &str) -> Result<(), AppError> {
        let started = Instant::now();

        match self.answer(question).await {
            Ok(response) => {
                let elapsed = started.elapsed();
                writeln!(self.output, "\nAssistente: {}", response)?;
                if self.config.prompt.show_timing {
                    writeln!(
                        self.output,
                        "(Tempo de resposta: {:.2} segundos)",
                        elapsed.as_secs_f64()
                    )?;
                }
                writeln!(self.output, "\n{}", "-".repeat(SEPARATOR_WIDTH))?;

                let recorded_elapsed = self.config.prompt.show_timing.then_some(elapsed);
                self.transcript
                    .record(question.to_string(), response, recorded_elapsed);
            }
            Err(err) => {
                tracing::error!("interaction failed: {}", err);
                writeln!(self.output, "Erro durante a interação: {}", err)?;
            }
        }

        Ok(())
    }

    async fn answer(&self, question: &str) -> Result<String, AppError> {
        let context = self.retriever.context(question).await?;
        let messages = self.config.prompt.style.render(&context, question);
        let request = ChatRequest::new(messages)
            .with_temperature(self.config.llm.temperature)
            .with_max_tokens(self.config.llm.max_tokens);

        self.completion
            .complete(request, &self.config.llm.model)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm::EmbeddingProvider;
    use crate::rag::{EmbeddingIndex, TextChunk};

    use super::*;

    /// Embeds every input as the same unit vector.
    struct UnitEmbedder;

    #[async_trait]
    impl EmbeddingProvider for UnitEmbedder {
        async fn embed(
            &self,
            inputs: &[String],
            _model_id: &str,
        ) -> Result<Vec<Vec<f32>>, AppError> {
            Ok(vec![vec![1.0, 0.0]; inputs.len()])
        }
    }

    /// Pops one scripted result per completion call.
    struct ScriptedCompletion {
        responses: Mutex<VecDeque<Result<String, String>>>,
    }

    impl ScriptedCompletion {
        fn new(responses: Vec<Result<&str, &str>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedCompletion {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _request: ChatRequest,
            _model_id: &str,
        ) -> Result<String, AppError> {
            self.responses
                .lock()
                .expect("lock")
                .pop_front()
                .expect("unexpected completion call")
                .map_err(AppError::Generation)
        }
    }

    async fn make_retriever() -> Retriever {
        let chunks = vec![TextChunk {
            text: "o contexto do documento".to_string(),
            source: "doc".to_string(),
            start_offset: 0,
            chunk_index: 0,
        }];
        let index = EmbeddingIndex::build(chunks, &UnitEmbedder, "test-model")
            .await
            .expect("index should build");
        Retriever::new(index, Arc::new(UnitEmbedder), "test-model".to_string(), 1)
    }

    async fn run_session(
        input: &str,
        completion: Arc<dyn CompletionProvider>,
        configure: impl FnOnce(&mut AppConfig),
    ) -> String {
        let mut config = AppConfig::default();
        configure(&mut config);

        let retriever = make_retriever().await;
        let mut output = Vec::new();
        let session = Session::new(
            config,
            retriever,
            completion,
            Cursor::new(input.as_bytes().to_vec()),
            &mut output,
        );
        session.run().await.expect("session should run");
        String::from_utf8(output).expect("utf-8 output")
    }

    #[tokio::test]
    async fn ask_save_exit_writes_the_transcript() {
        let dir = tempfile::tempdir().expect("temp dir");
        let transcript = dir.path().join("historico.txt");

        let completion = ScriptedCompletion::new(vec![Ok("resposta gerada")]);
        let transcript_path = transcript.clone();
        let output = run_session(
            "qual é o contexto?\nsalvar\nsair\n",
            completion,
            move |config| config.transcript_file = transcript_path,
        )
        .await;

        assert!(output.contains("Assistente: resposta gerada"));
        assert!(output.contains("Conversa salva em"));

        let saved = std::fs::read_to_string(&transcript).expect("transcript exists");
        assert_eq!(saved.matches("--- Interação ").count(), 1);
        assert!(saved.contains("Você: qual é o contexto?"));
        assert!(saved.contains("Assistente: resposta gerada"));
    }

    #[tokio::test]
    async fn exit_without_save_writes_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let transcript = dir.path().join("historico.txt");

        let completion = ScriptedCompletion::new(vec![Ok("resposta")]);
        let transcript_path = transcript.clone();
        run_session("uma pergunta\nsair\n", completion, move |config| {
            config.transcript_file = transcript_path
        })
        .await;

        assert!(!transcript.exists());
    }

    #[tokio::test]
    async fn generation_failure_is_printed_and_the_loop_continues() {
        let completion = ScriptedCompletion::new(vec![
            Err("endpoint indisponível"),
            Ok("agora funcionou"),
        ]);
        let output = run_session(
            "primeira pergunta\nsegunda pergunta\nsair\n",
            completion,
            |_| {},
        )
        .await;

        assert!(output.contains("Erro durante a interação"));
        assert!(output.contains("Assistente: agora funcionou"));
    }

    #[tokio::test]
    async fn end_of_input_terminates_the_loop() {
        let completion = ScriptedCompletion::new(vec![]);
        let output = run_session("", completion, |_| {}).await;
        assert!(output.contains("=== Chat Iniciado ==="));
    }

    #[tokio::test]
    async fn timing_is_printed_only_when_enabled() {
        let completion = ScriptedCompletion::new(vec![Ok("resposta")]);
        let output = run_session("pergunta\nsair\n", completion, |config| {
            config.prompt.show_timing = false
        })
        .await;
        assert!(!output.contains("Tempo de resposta"));

        let completion = ScriptedCompletion::new(vec![Ok("resposta")]);
        let output = run_session("pergunta\nsair\n", completion, |_| {}).await;
        assert!(output.contains("Tempo de resposta"));
    }

    #[tokio::test]
    async fn reserved_commands_are_case_insensitive() {
        // "SAIR" must terminate before any completion is requested.
        let completion = ScriptedCompletion::new(vec![]);
        let output = run_session("SAIR\n", completion, |_| {}).await;
        assert!(!output.contains("Assistente:"));
    }
}
