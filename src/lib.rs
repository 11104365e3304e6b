//! climateframe - framing classification for climate news
//!
//! Classifies a newspaper article along three independent tasks using an
//! external language-model backend:
//!
//! - **Actor framing**: who is the hero, villain and victim, and which role
//!   the article focuses on
//! - **Action framing**: whether the article fuels or prevents resolution or
//!   conflict around the climate crisis
//! - **Story framing**: the cultural story (hierarchical, individualistic,
//!   egalitarian) the article reflects
//!
//! Backend answers are never trusted: every payload is re-validated against
//! the fixed taxonomies and normalized before it reaches the caller.

pub mod errors;
pub mod taxonomy;
pub mod task;
pub mod validation;
pub mod backend;
pub mod orchestrator;

// Re-export commonly used types
pub use errors::{BackendError, ClassifierError, RegistryError, Result, ValidationError};
pub use orchestrator::{AggregatedResult, ClassificationOrchestrator, TaskOutcome, TaskState};

// Application layer
pub mod article;
pub mod sources;
pub mod statistics;
pub mod cli;
pub mod config;
