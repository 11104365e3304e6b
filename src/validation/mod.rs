//! Backend output validation
//! Extracts, checks and normalizes classification payloads

pub mod payload;
pub mod types;
pub mod validator;

pub use payload::extract_candidate;
pub use types::{ActorFraming, ClassificationRecord, RawCandidate};
pub use validator::{ResultValidator, ValidatorConfig};
