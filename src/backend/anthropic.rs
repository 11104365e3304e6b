//! Anthropic Messages API backend

use crate::backend::{article_prompt, status_error, transport_error, ClassificationBackend};
use crate::config::AnthropicConfig;
use crate::errors::BackendError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic classification backend
#[derive(Clone)]
pub struct AnthropicBackend {
    client: Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    api_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for AnthropicBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicBackend")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl AnthropicBackend {
    /// Build from configuration, reading the key from the configured env var
    pub fn from_config(config: &AnthropicConfig, timeout: Duration) -> Result<Self, BackendError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                BackendError::Configuration(format!(
                    "environment variable {} is not set",
                    config.api_key_env
                ))
            })?;

        Self::with_api_key(&config.base_url, &config.model, config.max_tokens, api_key, timeout)
    }

    pub fn with_api_key(
        base_url: &str,
        model: &str,
        max_tokens: u32,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            max_tokens,
            api_key,
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ClassificationBackend for AnthropicBackend {
    async fn invoke(&self, instruction: &str, article_text: &str) -> Result<String, BackendError> {
        let url = format!("{}/v1/messages", self.base_url);

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: instruction,
            messages: vec![Message {
                role: "user",
                content: article_prompt(article_text),
            }],
        };

        tracing::debug!(model = %self.model, "sending messages request to Anthropic");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, error_text));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        body.first_text()
            .ok_or_else(|| BackendError::InvalidResponse("no text content block".to_string()))
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    async fn health_check(&self) -> Result<bool, BackendError> {
        Ok(!self.api_key.is_empty())
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn first_text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
    }
}
