//! Configuration management for climateframe
//!
//! TOML-based configuration with defaults and validation.
//! Location: ~/.climateframe/config.toml

use crate::errors::{ClassifierError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub ollama: OllamaConfig,
    pub anthropic: AnthropicConfig,
    pub batch: BatchConfig,
}

/// Which classification service to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Ollama,
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Ollama => "ollama",
            Provider::Anthropic => "anthropic",
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(ClassifierError::Config(format!("Unknown provider: {}", other))),
        }
    }
}

/// Backend selection and shared call settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub provider: Provider,
    pub timeout_secs: u64,
}

/// Ollama connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
}

/// Anthropic Messages API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

/// Batch classification configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub max_concurrent_articles: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Ollama,
            timeout_secs: 120,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11434,
            model: "gemma:2b".to_string(),
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_articles: 4,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ClassifierError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location, or built-in defaults if absent
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".climateframe").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.backend.timeout_secs == 0 {
            return Err(ClassifierError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.batch.max_concurrent_articles == 0 {
            return Err(ClassifierError::Config(
                "max_concurrent_articles must be greater than 0".to_string(),
            ));
        }

        if self.ollama.model.trim().is_empty() || self.anthropic.model.trim().is_empty() {
            return Err(ClassifierError::Config("model name must not be empty".to_string()));
        }

        if self.anthropic.max_tokens == 0 {
            return Err(ClassifierError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ClassifierError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get Ollama base URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }

    /// Override the active provider's model name
    pub fn set_model(&mut self, model: impl Into<String>) {
        match self.backend.provider {
            Provider::Ollama => self.ollama.model = model.into(),
            Provider::Anthropic => self.anthropic.model = model.into(),
        }
    }

    /// Model name of the active provider
    pub fn active_model(&self) -> &str {
        match self.backend.provider {
            Provider::Ollama => &self.ollama.model,
            Provider::Anthropic => &self.anthropic.model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.provider, Provider::Ollama);
        assert_eq!(config.ollama.port, 11434);
        assert_eq!(config.anthropic.max_tokens, 1024);
        assert_eq!(config.batch.max_concurrent_articles, 4);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_concurrency() {
        let mut config = Config::default();
        config.batch.max_concurrent_articles = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_model() {
        let mut config = Config::default();
        config.ollama.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend]\nprovider = \"anthropic\"\n\n[anthropic]\nmodel = \"claude-test\"").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.backend.provider, Provider::Anthropic);
        assert_eq!(config.backend.timeout_secs, 120);
        assert_eq!(config.active_model(), "claude-test");
        assert_eq!(config.anthropic.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend]\nprovider = \"openai\"").unwrap();

        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(ClassifierError::Config(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_model("llama3.1:8b");
        config.save(&path).unwrap();

        let reloaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(reloaded.ollama.model, "llama3.1:8b");
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("Anthropic".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!("gpt".parse::<Provider>().is_err());
    }

    #[test]
    fn test_ollama_url() {
        assert_eq!(Config::default().ollama_url(), "http://127.0.0.1:11434");
    }
}
