//! Classification task descriptions
//!
//! A [`TaskSpec`] declares the exact shape of a valid backend answer for one
//! task: the ordered required fields, the taxonomy bound to each field and
//! whether the `NONE` sentinel is allowed.

use crate::errors::RegistryError;
use crate::task::prompts;
use crate::taxonomy::{Taxonomy, NONE_LABEL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three independent framing tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Actor,
    Action,
    Story,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Actor, TaskKind::Action, TaskKind::Story];

    /// Registry name of the task
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Actor => "actor_task",
            TaskKind::Action => "action_task",
            TaskKind::Story => "story_task",
        }
    }

    /// Look up a task by registry name
    pub fn from_name(name: &str) -> Result<Self, RegistryError> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| RegistryError::UnknownTask(name.to_string()))
    }

    /// Fixed instruction template sent to the backend
    pub fn instruction(&self) -> &'static str {
        match self {
            TaskKind::Actor => prompts::ACTOR_INSTRUCTION,
            TaskKind::Action => prompts::ACTION_INSTRUCTION,
            TaskKind::Story => prompts::STORY_INSTRUCTION,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One required output field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Field name in the backend JSON object
    pub name: &'static str,

    /// Taxonomy the value must belong to
    pub taxonomy: Taxonomy,

    /// Whether `NONE` is an accepted value
    pub nullable: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, taxonomy: Taxonomy, nullable: bool) -> Self {
        Self {
            name,
            taxonomy,
            nullable,
        }
    }

    /// Check a canonical (already upper-cased) value against this field
    pub fn accepts(&self, value: &str) -> bool {
        self.taxonomy.contains(value) || (self.nullable && value == NONE_LABEL)
    }
}

/// Output contract for one classification task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSpec {
    kind: TaskKind,
    fields: Vec<FieldSpec>,
}

impl TaskSpec {
    /// Hero, villain and victim slots plus the emphasized role
    pub fn actor() -> Self {
        Self {
            kind: TaskKind::Actor,
            fields: vec![
                FieldSpec::new("hero_class", Taxonomy::Actor, true),
                FieldSpec::new("villain_class", Taxonomy::Actor, true),
                FieldSpec::new("victim_class", Taxonomy::Actor, true),
                FieldSpec::new("focus", Taxonomy::Focus, false),
            ],
        }
    }

    pub fn action() -> Self {
        Self {
            kind: TaskKind::Action,
            fields: vec![FieldSpec::new("action", Taxonomy::Action, false)],
        }
    }

    pub fn story() -> Self {
        Self {
            kind: TaskKind::Story,
            fields: vec![FieldSpec::new("story", Taxonomy::Story, false)],
        }
    }

    pub fn for_kind(kind: TaskKind) -> Self {
        match kind {
            TaskKind::Actor => Self::actor(),
            TaskKind::Action => Self::action(),
            TaskKind::Story => Self::story(),
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Required fields in declaration order
    pub fn required_fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Find a declared field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the field is part of this task's output
    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Taxonomy bound to a declared field
    pub fn taxonomy_for(&self, field: &str) -> Result<Taxonomy, RegistryError> {
        self.field(field)
            .map(|f| f.taxonomy)
            .ok_or_else(|| RegistryError::UnknownField {
                task: self.name().to_string(),
                field: field.to_string(),
            })
    }

    pub fn instruction(&self) -> &'static str {
        self.kind.instruction()
    }
}
