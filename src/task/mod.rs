//! Classification tasks
//!
//! Task contracts and their fixed instruction templates.

pub mod prompts;
pub mod spec;

pub use spec::{FieldSpec, TaskKind, TaskSpec};
