//! Result validator
//!
//! Checks a backend candidate against a task contract and produces a
//! normalized [`ClassificationRecord`]:
//! 1. Every required field must be present with a string value
//! 2. Every required value must be a taxonomy label, or `NONE` where nullable
//! 3. Undeclared fields are dropped, never fatal
//! 4. Values are trimmed and upper-cased to canonical labels

use crate::errors::ValidationError;
use crate::task::TaskSpec;
use crate::validation::payload;
use crate::validation::types::{ClassificationRecord, RawCandidate};
use std::collections::BTreeMap;

/// Validator configuration
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Strip surrounding whitespace from values
    pub trim_whitespace: bool,

    /// Upper-case values before the membership check
    pub normalize_case: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            trim_whitespace: true,
            normalize_case: true,
        }
    }
}

/// Validator for backend classification output
#[derive(Debug, Clone, Default)]
pub struct ResultValidator {
    config: ValidatorConfig,
}

impl ResultValidator {
    /// Create new validator with default configuration
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Create validator with custom configuration
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a parsed candidate against a task contract
    pub fn validate(
        &self,
        spec: &TaskSpec,
        candidate: &RawCandidate,
    ) -> Result<ClassificationRecord, ValidationError> {
        // Stage 1: presence
        for field in spec.required_fields() {
            if let Some(kind) = candidate.non_string_kind(field.name) {
                return Err(ValidationError::MalformedPayload(format!(
                    "field '{}' must be a string, found {}",
                    field.name, kind
                )));
            }
            if candidate.get(field.name).is_none() {
                return Err(ValidationError::MissingField {
                    field: field.name.to_string(),
                });
            }
        }

        // Stage 2: membership + normalization
        let mut fields = BTreeMap::new();
        for field in spec.required_fields() {
            let raw = candidate.get(field.name).unwrap_or_default();
            let canonical = self.normalize(raw);

            if !field.accepts(&canonical) {
                return Err(ValidationError::InvalidLabel {
                    field: field.name.to_string(),
                    value: raw.to_string(),
                });
            }

            fields.insert(field.name.to_string(), canonical);
        }

        // Stage 3: extras are backend drift
        let extras: Vec<&str> = candidate
            .field_names()
            .filter(|name| !spec.declares(name))
            .collect();
        if !extras.is_empty() {
            tracing::debug!(
                task = spec.name(),
                extras = ?extras,
                "dropping undeclared fields from backend output"
            );
        }

        Ok(ClassificationRecord::new(spec.kind(), fields))
    }

    /// Extract a candidate from raw backend text, then validate it
    pub fn validate_text(
        &self,
        spec: &TaskSpec,
        text: &str,
    ) -> Result<ClassificationRecord, ValidationError> {
        let candidate = payload::extract_candidate(text)?;
        self.validate(spec, &candidate)
    }

    fn normalize(&self, value: &str) -> String {
        let value = if self.config.trim_whitespace {
            value.trim()
        } else {
            value
        };

        if self.config.normalize_case {
            value.to_uppercase()
        } else {
            value.to_string()
        }
    }
}
