//! Ollama generate backend
//!
//! Endpoint: POST /api/generate with `format: "json"` and `stream: false`,
//! so the whole completion arrives in the `response` field.

use crate::backend::{article_prompt, status_error, transport_error, ClassificationBackend};
use crate::errors::BackendError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "gemma:2b";

/// Default request timeout (120 seconds)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Ollama classification backend
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaBackend {
    /// Create backend with default settings
    pub fn new() -> Result<Self, BackendError> {
        Self::with_config(DEFAULT_OLLAMA_URL, DEFAULT_MODEL, REQUEST_TIMEOUT)
    }

    /// Create backend with custom configuration
    pub fn with_config(base_url: &str, model: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ClassificationBackend for OllamaBackend {
    async fn invoke(&self, instruction: &str, article_text: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = OllamaGenerateRequest {
            model: &self.model,
            system: instruction,
            prompt: article_prompt(article_text),
            format: "json",
            stream: false,
        };

        tracing::debug!(model = %self.model, "sending generate request to Ollama");

        let response = self
            .client
            .post(&url)
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

        let body: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(body.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    /// Check if Ollama is available
    async fn health_check(&self) -> Result<bool, BackendError> {
        let url = format!("{}/api/version", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

/// Ollama generate request
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: String,
    format: &'a str,
    stream: bool,
}

/// Ollama non-streaming generate response
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_creation() {
        let backend = OllamaBackend::new().unwrap();
        assert_eq!(backend.model(), DEFAULT_MODEL);
        assert_eq!(backend.base_url(), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_backend_with_config() {
        let backend =
            OllamaBackend::with_config("http://localhost:11434/", "llama2:7b", Duration::from_secs(5))
                .unwrap();
        assert_eq!(backend.model(), "llama2:7b");
        assert_eq!(backend.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_request_shape() {
        let request = OllamaGenerateRequest {
            model: "gemma:2b",
            system: "instruction",
            prompt: article_prompt("text"),
            format: "json",
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["system"], "instruction");
        assert_eq!(value["prompt"], "Article:\ntext");
        assert_eq!(value["format"], "json");
        assert_eq!(value["stream"], false);
    }

    #[tokio::test]
    #[ignore] // Requires Ollama running
    async fn test_health_check_integration() {
        let backend = OllamaBackend::new().unwrap();
        assert!(backend.health_check().await.unwrap());
    }
}
