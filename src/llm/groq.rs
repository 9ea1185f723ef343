use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::core::errors::AppError;

use super::provider::{CompletionProvider, EmbeddingProvider};
use super::types::ChatRequest;

/// Client for Groq's OpenAI-compatible API.
///
/// The same host serves chat completions and embeddings, so one client
/// implements both provider traits.
#[derive(Clone)]
pub struct GroqProvider {
    base_url: String,
    api_key: String,
    client: Client,
}

impl GroqProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: ChatRequest, model_id: &str) -> Result<String, AppError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut body = json!({
            "model": model_id,
            "messages": request.messages,
            "stream": false,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
            if let Some(s) = request.stop {
                obj.insert("stop".to_string(), json!(s));
            }
        }

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(AppError::generation)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::Generation(format!(
                "chat completion returned {}: {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(AppError::generation)?;
        parse_chat_response(&payload)
    }
}

#[async_trait]
impl EmbeddingProvider for GroqProvider {
    async fn embed(
        &self,
        inputs: &[String],
        model_id: &str,
    ) -> Result<Vec<Vec<f32>>, AppError> {
        let url = format!("{}/v1/embeddings", self.base_url);

        let body = json!({
            "model": model_id,
            "input": inputs,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(AppError::retrieval)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::Retrieval(format!(
                "embedding request returned {}: {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(AppError::retrieval)?;
        parse_embedding_response(&payload, inputs.len())
    }
}

fn parse_chat_response(payload: &Value) -> Result<String, AppError> {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| {
            AppError::Generation("chat completion response missing message content".to_string())
        })
}

fn parse_embedding_response(payload: &Value, expected: usize) -> Result<Vec<Vec<f32>>, AppError> {
    let data = payload["data"].as_array().ok_or_else(|| {
        AppError::Retrieval("embedding response missing data array".to_string())
    })?;

    let mut embeddings = Vec::with_capacity(data.len());
    for item in data {
        let vals = item["embedding"].as_array().ok_or_else(|| {
            AppError::Retrieval("embedding response entry missing vector".to_string())
        })?;
        let vec: Vec<f32> = vals
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect();
        embeddings.push(vec);
    }

    if embeddings.len() != expected {
        return Err(AppError::Retrieval(format!(
            "embedding count mismatch: expected {}, got {}",
            expected,
            embeddings.len()
        )));
    }

    Ok(embeddings)
}
