//! Classification backends
//!
//! A backend takes a fixed instruction template plus the article text and
//! returns the model's raw completion text. The core never retries; each
//! call is a single attempt whose failure is reported per task.

pub mod anthropic;
pub mod ollama;

pub use anthropic::AnthropicBackend;
pub use ollama::OllamaBackend;

use crate::config::{Config, Provider};
use crate::errors::BackendError;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

/// External classification service
#[async_trait]
pub trait ClassificationBackend: Send + Sync {
    /// Run one completion with `instruction` as the system prompt
    async fn invoke(&self, instruction: &str, article_text: &str) -> Result<String, BackendError>;

    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Whether the backend looks reachable and usable
    async fn health_check(&self) -> Result<bool, BackendError> {
        Ok(true)
    }
}

/// User message wrapping the article text
pub fn article_prompt(article_text: &str) -> String {
    format!("Article:\n{}", article_text)
}

/// Build the configured backend
pub fn from_config(config: &Config) -> Result<Arc<dyn ClassificationBackend>, BackendError> {
    let timeout = Duration::from_secs(config.backend.timeout_secs);

    match config.backend.provider {
        Provider::Ollama => Ok(Arc::new(OllamaBackend::with_config(
            &config.ollama_url(),
            &config.ollama.model,
            timeout,
        )?)),
        Provider::Anthropic => Ok(Arc::new(AnthropicBackend::from_config(
            &config.anthropic,
            timeout,
        )?)),
    }
}

/// Map a non-success HTTP status to a backend error
pub(crate) fn status_error(status: StatusCode, body: String) -> BackendError {
    match status.as_u16() {
        401 | 403 => BackendError::Auth(format!("HTTP {}: {}", status, body)),
        429 => BackendError::RateLimited(body),
        code => BackendError::Api {
            status: code,
            message: body,
        },
    }
}

/// Map a transport error, surfacing timeouts distinctly
pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout {
            duration_ms: timeout.as_millis() as u64,
        }
    } else {
        BackendError::Http(err)
    }
}
