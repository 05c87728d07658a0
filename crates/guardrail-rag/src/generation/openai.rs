//! OpenAI API client for embeddings and chat completions with retry logic

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::OpenAiConfig;
use crate::error::{Error, Result};

/// OpenAI API client with automatic retry
pub struct OpenAiClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: OpenAiConfig,
}

/// One failed request attempt
enum Attempt {
    /// Transport errors, 408, 429 and 5xx: worth repeating
    Transient(Error),
    /// Other 4xx responses: repeating cannot succeed
    Permanent(Error),
}

impl Attempt {
    fn for_status(status: StatusCode, error: Error) -> Self {
        if is_retryable(status) {
            Attempt::Transient(error)
        } else {
            Attempt::Permanent(error)
        }
    }
}

impl From<Error> for Attempt {
    fn from(error: Error) -> Self {
        Attempt::Transient(error)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl OpenAiClient {
    /// Create a new OpenAI client with retry support
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Chat model name
    pub fn chat_model(&self) -> &str {
        &self.config.chat_model
    }

    /// Embedding dimensions requested from the API
    pub fn dimensions(&self) -> usize {
        self.config.embedding_dimensions
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Retry a request with exponential backoff; permanent failures return at once
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, Attempt>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(Attempt::Permanent(e)) => return Err(e),
                Err(Attempt::Transient(e)) => {
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "OpenAI request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.config.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Llm("Unknown error".to_string())))
    }

    /// Check if the API key is accepted
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.url("models"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await;

        match response {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding with retry
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.url("embeddings");
        let url = url.as_str();

        self.retry_request(move || async move {
            let request = EmbedRequest {
                model: &self.config.embedding_model,
                input: text,
                dimensions: self.config.embedding_dimensions,
            };

            let response = self
                .client
                .post(url)
                .bearer_auth(&self.config.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Attempt::for_status(
                    status,
                    Error::embedding(format!("Embedding failed: HTTP {} - {}", status, body)),
                ));
            }

            let embed_response: EmbedResponse = response.json().await.map_err(|e| {
                Error::embedding(format!("Failed to parse embedding response: {}", e))
            })?;

            let embedding = embed_response
                .data
                .into_iter()
                .next()
                .map(|d| d.embedding)
                .ok_or_else(|| Error::embedding("Embedding response contained no vectors"))?;
            Ok(embedding)
        })
        .await
    }

    /// Send a single-turn chat prompt and return the reply text
    pub async fn chat(&self, prompt: &str) -> Result<String> {
        let url = self.url("chat/completions");
        let url = url.as_str();

        tracing::debug!("Generating answer with model: {}", self.config.chat_model);

        self.retry_request(move || async move {
            let request = ChatRequest {
                model: &self.config.chat_model,
                temperature: self.config.temperature,
                messages: vec![ChatMessage {
                    role: "user",
                    content: prompt,
                }],
            };

            let response = self
                .client
                .post(url)
                .bearer_auth(&self.config.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| Error::llm(format!("Generation request failed: {}", e)))?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED {
                return Err(Attempt::Permanent(Error::llm("OpenAI rejected the API key")));
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Attempt::for_status(
                    status,
                    Error::llm(format!("Generation failed: HTTP {} - {}", status, body)),
                ));
            }

            let body: Value = response
                .json()
                .await
                .map_err(|e| Error::llm(format!("Failed to parse generation response: {}", e)))?;

            Ok(reply_text(&body))
        })
        .await
    }
}

/// Extract the assistant text from a chat completion body.
///
/// A reply without `content` (refusals, tool calls) degrades to whatever
/// textual form the message has.
fn reply_text(body: &Value) -> String {
    let message = &body["choices"][0]["message"];
    if let Some(content) = message["content"].as_str() {
        return content.to_string();
    }
    if let Some(refusal) = message["refusal"].as_str() {
        return refusal.to_string();
    }
    if message.is_null() {
        body.to_string()
    } else {
        message.to_string()
    }
}
