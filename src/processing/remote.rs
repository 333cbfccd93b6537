//! Remote embedding backend speaking the OpenAI-compatible HTTP API

use crate::config::RemoteModelConfig;
use crate::error::{Result, ScreenerError};
use crate::processing::embeddings::{Embedding, EmbeddingProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for a remote embedding API. No retries: failures surface to the caller.
pub struct RemoteEmbedder {
    client: Client,
    base_url: String,
    api_key: String,
    embedding_model: String,
    chat_model: String,
}

impl RemoteEmbedder {
    pub fn new(remote: &RemoteModelConfig) -> Result<Self> {
        let api_key = remote.api_key.clone().ok_or_else(|| {
            ScreenerError::Configuration("remote provider requires an API key".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(remote.timeout_secs))
            .build()
            .map_err(|e| ScreenerError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: remote.base_url.trim_end_matches('/').to_string(),
            api_key,
            embedding_model: remote.embedding_model.clone(),
            chat_model: remote.chat_model.clone(),
        })
    }

    /// Single-turn chat completion, returning the trimmed reply text.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.2,
            max_tokens: 250,
        };

        let response: ChatResponse = self.post("chat/completions", &request).await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| ScreenerError::RemoteApi {
                status: 200,
                message: "chat completion returned no content".to_string(),
            })
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(ScreenerError::RemoteApi {
                status: status.as_u16(),
                message,
            });
        }

        // an undecodable body is an API error
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ScreenerError::RemoteApi {
            status: status.as_u16(),
            message: format!("unexpected response body: {}", e),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: text,
        };

        let response: EmbeddingResponse = self.post("embeddings", &request).await?;
        match response.data.into_iter().next() {
            Some(data) if !data.embedding.is_empty() => Ok(data.embedding),
            _ => Err(ScreenerError::RemoteApi {
                status: 200,
                message: "embedding response contained no vector".to_string(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        &self.embedding_model
    }
}
