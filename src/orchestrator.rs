//! Classification orchestration
//!
//! Fans one article out to the three framing tasks, validates each backend
//! answer independently and assembles the per-article result.
//!
//! Per-task state machine (single shot, no transitions back):
//!
//! ```text
//! Pending → BackendCalled → { Valid | Invalid | BackendFailed }
//! ```

use crate::article::Article;
use crate::backend::ClassificationBackend;
use crate::task::{TaskKind, TaskSpec};
use crate::taxonomy::{ActionClass, StoryClass, TaxonomyRegistry};
use crate::validation::{ActorFraming, ClassificationRecord, ResultValidator};
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default number of articles classified at once in a batch
pub const DEFAULT_MAX_CONCURRENT_ARTICLES: usize = 4;

/// Lifecycle of one task classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Pending,
    BackendCalled,
    Valid,
    Invalid,
    BackendFailed,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Valid | TaskState::Invalid | TaskState::BackendFailed)
    }
}

/// Terminal outcome of one task for one article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskOutcome {
    Ok {
        record: ClassificationRecord,
    },
    Failed {
        /// `Invalid` or `BackendFailed`
        state: TaskState,
        reason: String,
    },
}

impl TaskOutcome {
    pub fn state(&self) -> TaskState {
        match self {
            TaskOutcome::Ok { .. } => TaskState::Valid,
            TaskOutcome::Failed { state, .. } => *state,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, TaskOutcome::Ok { .. })
    }

    pub fn record(&self) -> Option<&ClassificationRecord> {
        match self {
            TaskOutcome::Ok { record } => Some(record),
            TaskOutcome::Failed { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            TaskOutcome::Ok { .. } => None,
            TaskOutcome::Failed { reason, .. } => Some(reason),
        }
    }
}

/// All three task outcomes for one article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub actor: TaskOutcome,
    pub action: TaskOutcome,
    pub story: TaskOutcome,
}

impl AggregatedResult {
    pub fn outcome(&self, kind: TaskKind) -> &TaskOutcome {
        match kind {
            TaskKind::Actor => &self.actor,
            TaskKind::Action => &self.action,
            TaskKind::Story => &self.story,
        }
    }

    /// Whether every task produced a valid record
    pub fn is_complete(&self) -> bool {
        TaskKind::ALL.iter().all(|kind| self.outcome(*kind).is_ok())
    }

    /// Tasks that ended in a failure state
    pub fn failed_tasks(&self) -> Vec<TaskKind> {
        TaskKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.outcome(*kind).is_ok())
            .collect()
    }

    pub fn actor_framing(&self) -> Option<ActorFraming> {
        self.actor.record().and_then(ClassificationRecord::actor_framing)
    }

    pub fn action(&self) -> Option<ActionClass> {
        self.action.record().and_then(ClassificationRecord::action)
    }

    pub fn story(&self) -> Option<StoryClass> {
        self.story.record().and_then(ClassificationRecord::story)
    }
}

/// Classification result kept together with its article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleClassification {
    pub article: Article,
    pub result: AggregatedResult,
}

/// Outcome of one article in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEntry {
    Classified(ArticleClassification),
    /// Cancelled before classification started
    Cancelled(Article),
}

impl BatchEntry {
    pub fn classification(&self) -> Option<&ArticleClassification> {
        match self {
            BatchEntry::Classified(c) => Some(c),
            BatchEntry::Cancelled(_) => None,
        }
    }
}

/// Cancellation handle for batch classification.
///
/// Cancelling only affects articles that have not started; results already
/// produced are returned unchanged.
#[derive(Debug, Clone, Default)]
pub struct BatchCancel {
    cancelled: Arc<AtomicBool>,
}

impl BatchCancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Multi-task classification orchestrator
pub struct ClassificationOrchestrator {
    /// External classification service
    backend: Arc<dyn ClassificationBackend>,

    /// Output validator
    validator: ResultValidator,

    /// Task contracts
    registry: &'static TaxonomyRegistry,

    /// Batch concurrency bound
    max_concurrent_articles: usize,
}

impl ClassificationOrchestrator {
    /// Create orchestrator with the default validator
    pub fn new(backend: Arc<dyn ClassificationBackend>) -> Self {
        Self::with_validator(backend, ResultValidator::new())
    }

    /// Create orchestrator with custom validator
    pub fn with_validator(backend: Arc<dyn ClassificationBackend>, validator: ResultValidator) -> Self {
        Self {
            backend,
            validator,
            registry: TaxonomyRegistry::global(),
            max_concurrent_articles: DEFAULT_MAX_CONCURRENT_ARTICLES,
        }
    }

    /// Set the batch concurrency bound (minimum 1)
    pub fn with_max_concurrent_articles(mut self, max: usize) -> Self {
        self.max_concurrent_articles = max.max(1);
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Classify one article text across all tasks.
    ///
    /// Always returns a complete result; each task slot is either a valid
    /// record or an explicit failure.
    pub async fn classify(&self, article_text: &str) -> AggregatedResult {
        let (actor, action, story) = tokio::join!(
            self.run_task(TaskKind::Actor, article_text),
            self.run_task(TaskKind::Action, article_text),
            self.run_task(TaskKind::Story, article_text),
        );

        AggregatedResult {
            actor,
            action,
            story,
        }
    }

    /// Classify an article and keep its metadata with the result
    pub async fn classify_article(&self, article: &Article) -> ArticleClassification {
        let result = self.classify(&article.prompt_text()).await;

        let failed = result.failed_tasks();
        if failed.is_empty() {
            tracing::info!(title = %article.title, "article classified");
        } else {
            tracing::info!(
                title = %article.title,
                failed = ?failed,
                "article classified with failed tasks"
            );
        }

        ArticleClassification {
            article: article.clone(),
            result,
        }
    }

    /// Classify many articles with bounded concurrency, in input order
    pub async fn classify_batch(&self, articles: Vec<Article>, cancel: &BatchCancel) -> Vec<BatchEntry> {
        let total = articles.len();

        let entries: Vec<BatchEntry> = stream::iter(articles)
            .map(|article| async move {
                if cancel.is_cancelled() {
                    return BatchEntry::Cancelled(article);
                }
                BatchEntry::Classified(self.classify_article(&article).await)
            })
            .buffered(self.max_concurrent_articles)
            .collect()
            .await;

        let cancelled = entries
            .iter()
            .filter(|e| matches!(e, BatchEntry::Cancelled(_)))
            .count();
        tracing::info!(total, cancelled, "batch classification finished");

        entries
    }

    /// Drive one task from `Pending` to a terminal state
    async fn run_task(&self, kind: TaskKind, article_text: &str) -> TaskOutcome {
        let spec: &TaskSpec = match self.registry.task(kind.name()) {
            Ok(spec) => spec,
            Err(e) => {
                return TaskOutcome::Failed {
                    state: TaskState::Invalid,
                    reason: e.to_string(),
                }
            }
        };

        let mut state = TaskState::Pending;
        tracing::trace!(task = %kind, ?state, "task starting");

        let response = self.backend.invoke(spec.instruction(), article_text).await;
        state = TaskState::BackendCalled;
        tracing::trace!(task = %kind, ?state, backend = self.backend.name(), "backend returned");

        let outcome = match response {
            Err(e) => TaskOutcome::Failed {
                state: TaskState::BackendFailed,
                reason: e.to_string(),
            },
            Ok(text) => match self.validator.validate_text(spec, &text) {
                Ok(record) => TaskOutcome::Ok { record },
                Err(e) => TaskOutcome::Failed {
                    state: TaskState::Invalid,
                    reason: e.to_string(),
                },
            },
        };

        if let Some(reason) = outcome.failure_reason() {
            tracing::warn!(task = %kind, state = ?outcome.state(), %reason, "task failed");
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BackendError;
    use async_trait::async_trait;

    /// Answers by instruction template; `None` simulates a backend failure
    struct FixedBackend {
        actor: Option<&'static str>,
        action: Option<&'static str>,
        story: Option<&'static str>,
    }

    #[async_trait]
    impl ClassificationBackend for FixedBackend {
        async fn invoke(&self, instruction: &str, _article_text: &str) -> Result<String, BackendError> {
            let answer = if instruction == TaskKind::Actor.instruction() {
                self.actor
            } else if instruction == TaskKind::Action.instruction() {
                self.action
            } else {
                self.story
            };
            answer
                .map(str::to_string)
                .ok_or_else(|| BackendError::RateLimited("try later".to_string()))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn orchestrator(backend: FixedBackend) -> ClassificationOrchestrator {
        ClassificationOrchestrator::new(Arc::new(backend))
    }

    const ACTOR_OK: &str = r#"{"hero_class":"ENV.ORGS_ACTIVISTS","villain_class":"INDUSTRY_EMISSIONS","victim_class":"GENERAL_PUBLIC","focus":"VICTIM"}"#;

    #[tokio::test]
    async fn test_all_tasks_valid() {
        let orch = orchestrator(FixedBackend {
            actor: Some(ACTOR_OK),
            action: Some(r#"{"action":"FUEL_RESOLUTION"}"#),
            story: Some(r#"{"story":"EGALITARIAN"}"#),
        });

        let result = orch.classify("article").await;
        assert!(result.is_complete());
        assert_eq!(result.action(), Some(ActionClass::FuelResolution));
        assert_eq!(result.story(), Some(StoryClass::Egalitarian));
    }

    #[tokio::test]
    async fn test_backend_failure_is_isolated() {
        let orch = orchestrator(FixedBackend {
            actor: Some(ACTOR_OK),
            action: None,
            story: Some(r#"{"story":"HIERARCHICAL"}"#),
        });

        let result = orch.classify("article").await;
        assert_eq!(result.action.state(), TaskState::BackendFailed);
        assert!(result.action.failure_reason().unwrap().contains("rate limited"));
        assert!(result.actor.is_ok());
        assert!(result.story.is_ok());
        assert_eq!(result.failed_tasks(), vec![TaskKind::Action]);
    }

    #[tokio::test]
    async fn test_invalid_output_is_isolated() {
        let orch = orchestrator(FixedBackend {
            actor: Some(ACTOR_OK),
            action: Some(r#"{"action":"DO_NOTHING"}"#),
            story: Some("not json at all"),
        });

        let result = orch.classify("article").await;
        assert!(result.actor.is_ok());
        assert_eq!(result.action.state(), TaskState::Invalid);
        assert_eq!(result.story.state(), TaskState::Invalid);
        assert!(result.story.failure_reason().unwrap().contains("Malformed payload"));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TaskState::Pending.is_terminal());
        assert!(!TaskState::BackendCalled.is_terminal());
        assert!(TaskState::Valid.is_terminal());
        assert!(TaskState::Invalid.is_terminal());
        assert!(TaskState::BackendFailed.is_terminal());
    }

    #[test]
    fn test_failed_outcome_serialization() {
        let outcome = TaskOutcome::Failed {
            state: TaskState::BackendFailed,
            reason: "timeout".to_string(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "FAILED");
        assert_eq!(value["state"], "BACKEND_FAILED");
        assert_eq!(value["reason"], "timeout");
    }

    #[test]
    fn test_batch_cancel_flag_shared() {
        let cancel = BatchCancel::new();
        let clone = cancel.clone();
        clone.cancel();
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_concurrency_bound_minimum() {
        let orch = orchestrator(FixedBackend {
            actor: None,
            action: None,
            story: None,
        })
        .with_max_concurrent_articles(0);
        assert_eq!(orch.max_concurrent_articles, 1);
    }
}
