//! Shared test backends

use async_trait::async_trait;
use climateframe::backend::ClassificationBackend;
use climateframe::orchestrator::BatchCancel;
use climateframe::task::TaskKind;
use climateframe::BackendError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const ACTOR_JSON: &str = r#"{"hero_class":"ENV.ORGS_ACTIVISTS","villain_class":"INDUSTRY_EMISSIONS","victim_class":"GENERAL_PUBLIC","focus":"VICTIM"}"#;
pub const ACTION_JSON: &str = r#"{"action":"FUEL_RESOLUTION"}"#;
pub const STORY_JSON: &str = r#"{"story":"EGALITARIAN"}"#;

/// Scripted reply for one task
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Fail,
}

/// Deterministic backend answering by instruction template
pub struct StubBackend {
    actor: Reply,
    action: Reply,
    story: Reply,
    calls: AtomicUsize,
    seen_instructions: Mutex<Vec<String>>,
    seen_articles: Mutex<Vec<String>>,
    cancel_at_call: Option<(usize, BatchCancel)>,
}

impl StubBackend {
    pub fn new(actor: Reply, action: Reply, story: Reply) -> Self {
        Self {
            actor,
            action,
            story,
            calls: AtomicUsize::new(0),
            seen_instructions: Mutex::new(Vec::new()),
            seen_articles: Mutex::new(Vec::new()),
            cancel_at_call: None,
        }
    }

    /// Cancel `cancel` while serving the `call`-th invocation (1-based)
    pub fn cancelling_at(mut self, call: usize, cancel: BatchCancel) -> Self {
        self.cancel_at_call = Some((call, cancel));
        self
    }

    /// Well-formed answers for every task
    pub fn valid() -> Self {
        Self::new(
            Reply::Text(ACTOR_JSON.to_string()),
            Reply::Text(ACTION_JSON.to_string()),
            Reply::Text(STORY_JSON.to_string()),
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_instructions(&self) -> Vec<String> {
        self.seen_instructions.lock().unwrap().clone()
    }

    pub fn seen_articles(&self) -> Vec<String> {
        self.seen_articles.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClassificationBackend for StubBackend {
    async fn invoke(&self, instruction: &str, article_text: &str) -> Result<String, BackendError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((at, cancel)) = &self.cancel_at_call {
            if call == *at {
                cancel.cancel();
            }
        }
        self.seen_instructions.lock().unwrap().push(instruction.to_string());
        self.seen_articles.lock().unwrap().push(article_text.to_string());

        let reply = if instruction == TaskKind::Actor.instruction() {
            &self.actor
        } else if instruction == TaskKind::Action.instruction() {
            &self.action
        } else if instruction == TaskKind::Story.instruction() {
            &self.story
        } else {
            return Err(BackendError::InvalidResponse("unexpected instruction".to_string()));
        };

        match reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(BackendError::Timeout { duration_ms: 30_000 }),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}
