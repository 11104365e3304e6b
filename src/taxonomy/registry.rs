//! Taxonomy registry
//!
//! Maps task names to their field contracts. Built once and never mutated,
//! so lookups need no locking.

use crate::errors::RegistryError;
use crate::task::{FieldSpec, TaskKind, TaskSpec};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static GLOBAL_REGISTRY: Lazy<TaxonomyRegistry> = Lazy::new(TaxonomyRegistry::new);

/// Read-only lookup of task specs by name
#[derive(Debug, Clone)]
pub struct TaxonomyRegistry {
    /// Map of task name to spec
    tasks: HashMap<&'static str, TaskSpec>,
}

impl TaxonomyRegistry {
    /// Create registry with all framing tasks
    pub fn new() -> Self {
        let tasks = TaskKind::ALL
            .iter()
            .map(|kind| (kind.name(), TaskSpec::for_kind(*kind)))
            .collect();

        Self { tasks }
    }

    /// Shared process-wide registry
    pub fn global() -> &'static TaxonomyRegistry {
        &GLOBAL_REGISTRY
    }

    /// Get the spec of a registered task
    pub fn task(&self, task: &str) -> Result<&TaskSpec, RegistryError> {
        self.tasks
            .get(task)
            .ok_or_else(|| RegistryError::UnknownTask(task.to_string()))
    }

    /// Get a field contract of a registered task
    pub fn field(&self, task: &str, field: &str) -> Result<&FieldSpec, RegistryError> {
        self.task(task)?
            .field(field)
            .ok_or_else(|| RegistryError::UnknownField {
                task: task.to_string(),
                field: field.to_string(),
            })
    }

    /// Ordered valid labels for a task field, excluding `NONE`
    pub fn labels_for(&self, task: &str, field: &str) -> Result<Vec<&'static str>, RegistryError> {
        Ok(self.field(task, field)?.taxonomy.labels())
    }

    /// Whether a task field accepts `NONE`
    pub fn is_nullable(&self, task: &str, field: &str) -> Result<bool, RegistryError> {
        Ok(self.field(task, field)?.nullable)
    }

    /// Registered task specs in canonical task order
    pub fn tasks(&self) -> Vec<&TaskSpec> {
        TaskKind::ALL
            .iter()
            .filter_map(|kind| self.tasks.get(kind.name()))
            .collect()
    }
}

impl Default for TaxonomyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
