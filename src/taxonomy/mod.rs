//! Framing taxonomies
//!
//! Enumerated label sets and the immutable registry that binds them to task
//! fields.

pub mod labels;
pub mod registry;

pub use labels::{ActionClass, ActorClass, FocusClass, StoryClass, Taxonomy, NONE_LABEL};
pub use registry::TaxonomyRegistry;
