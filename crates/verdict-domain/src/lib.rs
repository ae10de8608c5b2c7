//! Verdict Domain Layer
//!
//! Data contracts for the verdict survey tool. Every other crate depends on
//! the types defined here; nothing here depends on storage or presentation.
//!
//! ## Key Concepts
//!
//! - **Example**: a claim paired with ordered evidence sentences to be judged
//! - **Assignment**: the ordered list of examples a user must judge
//! - **Decision**: support, refute or cannot_decide, one per example
//! - **AnswerRecord**: a decision captured with the claim text and a timestamp
//! - **SurveyStore**: the tabular backend holding examples, assignments and results
//!
//! ## Architecture
//!
//! - Pure data and parsing only
//! - Parsing is strict: malformed rows fail fast instead of leaking through
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod answer;
pub mod assignment;
pub mod catalog;
pub mod decision;
pub mod error;
pub mod example;
pub mod traits;

// Re-exports for convenience
pub use answer::{AnswerRecord, RESULT_COLUMNS};
pub use assignment::{Assignment, AssignmentRow};
pub use catalog::ExampleCatalog;
pub use decision::Decision;
pub use error::DomainError;
pub use example::{Example, ExampleId, MAX_EVIDENCE_SENTENCES};
pub use traits::SurveyStore;
