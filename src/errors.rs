//! Error types for climateframe
//!
//! Errors are split by layer: registry lookups, payload validation and the
//! external classification backend. Validation and backend errors are
//! recovered per task by the orchestrator; registry errors indicate a wiring
//! bug.

use thiserror::Error;

/// Failure to turn a backend payload into a classification record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Backend output is not a flat field-to-string JSON object
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A required field is absent
    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    /// A field value is outside its taxonomy
    #[error("Invalid label '{value}' for field '{field}'")]
    InvalidLabel { field: String, value: String },
}

/// Registry lookup errors (caller or configuration bug)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Unknown field '{field}' for task '{task}'")]
    UnknownField { task: String, field: String },
}

/// Errors raised by a classification backend call
#[derive(Error, Debug)]
pub enum BackendError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success API response
    #[error("Backend API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Request exceeded the configured timeout
    #[error("Backend call timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Credentials rejected or missing
    #[error("Backend authentication failed: {0}")]
    Auth(String),

    /// Provider rate limit hit
    #[error("Backend rate limited: {0}")]
    RateLimited(String),

    /// Response envelope did not carry the expected completion text
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    /// Backend could not be constructed from configuration
    #[error("Backend configuration error: {0}")]
    Configuration(String),
}

/// Top-level error type for the classifier
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for classifier operations
pub type Result<T> = std::result::Result<T, ClassifierError>;
