//! Validation type definitions

use crate::errors::ValidationError;
use crate::task::TaskKind;
use crate::taxonomy::{ActionClass, ActorClass, FocusClass, StoryClass, NONE_LABEL};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat field-to-string mapping produced by a backend, before validation.
///
/// Keys whose JSON value was not a string are remembered by kind; whether
/// that matters is decided per declared field by the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCandidate {
    fields: BTreeMap<String, String>,
    #[serde(skip)]
    non_string: BTreeMap<String, &'static str>,
}

impl RawCandidate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and stubs
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Convert a parsed JSON value; only non-object payloads are rejected here
    pub fn from_json(value: serde_json::Value) -> Result<Self, ValidationError> {
        let object = match value {
            serde_json::Value::Object(object) => object,
            other => {
                return Err(ValidationError::MalformedPayload(format!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut candidate = Self::default();
        for (key, value) in object {
            match value {
                serde_json::Value::String(s) => {
                    candidate.fields.insert(key, s);
                }
                other => {
                    candidate.non_string.insert(key, json_kind(&other));
                }
            }
        }

        Ok(candidate)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// JSON kind of a field whose value was not a string
    pub fn non_string_kind(&self, field: &str) -> Option<&'static str> {
        self.non_string.get(field).copied()
    }

    /// All field names, string-valued or not
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .keys()
            .chain(self.non_string.keys())
            .map(String::as_str)
    }

    /// Number of string-valued fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawCandidate {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            non_string: BTreeMap::new(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Validated result of one task for one article.
///
/// Holds only the declared fields, each with its canonical upper-case label.
/// There are no mutating methods; a record is fixed once the validator
/// returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    task: TaskKind,
    fields: BTreeMap<String, String>,
}

impl ClassificationRecord {
    pub(crate) fn new(task: TaskKind, fields: BTreeMap<String, String>) -> Self {
        Self { task, fields }
    }

    pub fn task(&self) -> TaskKind {
        self.task
    }

    /// Canonical label of a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Typed view of an actor-task record
    pub fn actor_framing(&self) -> Option<ActorFraming> {
        if self.task != TaskKind::Actor {
            return None;
        }

        Some(ActorFraming {
            hero: self.get("hero_class").and_then(parse_actor_slot),
            villain: self.get("villain_class").and_then(parse_actor_slot),
            victim: self.get("victim_class").and_then(parse_actor_slot),
            focus: self.get("focus").and_then(FocusClass::parse)?,
        })
    }

    /// Typed view of an action-task record
    pub fn action(&self) -> Option<ActionClass> {
        self.get("action").and_then(ActionClass::parse)
    }

    /// Typed view of a story-task record
    pub fn story(&self) -> Option<StoryClass> {
        self.get("story").and_then(StoryClass::parse)
    }
}

fn parse_actor_slot(label: &str) -> Option<ActorClass> {
    if label == NONE_LABEL {
        None
    } else {
        ActorClass::parse(label)
    }
}

/// Hero/villain/victim assignment; `None` slots were reported as `NONE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActorFraming {
    pub hero: Option<ActorClass>,
    pub villain: Option<ActorClass>,
    pub victim: Option<ActorClass>,
    pub focus: FocusClass,
}
