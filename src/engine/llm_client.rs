use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::config::LlmSettings;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("llm request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("llm returned an empty response")]
    EmptyResponse,
    #[error("could not read a score from llm reply: {0:?}")]
    MalformedScore(String),
}

/// The one seam to the language model. Injected wherever a free-text answer
/// or an embedding is needed, so callers can be tested with a scripted stub.
/// No retry or backoff: failures propagate to the caller.
pub trait LlmClient {
    fn complete(&self, prompt: &str) -> Result<String, LlmError>;
    fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError>;
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Blocking client for an OpenAI-compatible endpoint.
pub struct ChatApi {
    base_url: String,
    model: String,
    temperature: f32,
    client: Client,
}

impl ChatApi {
    pub fn new(settings: &LlmSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            client: Client::new(),
        }
    }
}

impl LlmClient for ChatApi {
    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(chars = prompt.len(), "sending chat completion request");

        let req = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "system",
                content: prompt,
            }],
        };

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&req)
            .send()?
            .json::<ChatCompletionResponse>()?;

        let choice = resp.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        Ok(choice.message.content)
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let req = EmbeddingRequest {
            model: &self.model,
            input: vec![text],
        };

        let resp = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .json(&req)
            .send()?
            .json::<EmbeddingResponse>()?;

        let data = resp.data.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        Ok(data.embedding)
    }
}
