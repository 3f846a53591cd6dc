//! Chat completion client used to ask for song suggestions.
//!
//! The pipeline depends on the [`TextCompletion`] trait only, so tests can swap
//! in a canned reply. [`OpenAiClient`] talks to any OpenAI-compatible
//! `/chat/completions` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::{
    config::{self, ConfigError},
    types::{ChatMessage, ChatRequest, ChatResponse},
    utils,
};

const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion API returned no message content")]
    EmptyReply,
}

#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Sends one system and one user message and returns the reply text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(http: Client, api_url: &str, api_key: &str, model: &str) -> Self {
        OpenAiClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Builds a client from `OPENAI_API_KEY`, `OPENAI_API_URL` and `OPENAI_MODEL`.
    ///
    /// The underlying HTTP client has no timeout: completions routinely take
    /// longer than any catalog call.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = config::openai_api_key()?;
        Ok(Self::new(
            Client::new(),
            &config::openai_apiurl(),
            &api_key,
            &config::openai_model(),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextCompletion for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: utils::preview(&body, 200),
            });
        }

        let reply = response.json::<ChatResponse>().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(CompletionError::EmptyReply)
    }
}
