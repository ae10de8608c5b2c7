//! Trait definitions for external interactions
//!
//! The survey backend is a tabular store with three logical tables:
//! `examples`, `assignments` and the append-only `results`.
//! Implementations live in other crates.

use crate::{AnswerRecord, AssignmentRow, Example, ExampleCatalog};

/// Trait for the tabular survey backend
///
/// Implemented by the infrastructure layer (verdict-store)
pub trait SurveyStore {
    /// Error type for store operations
    type Error;

    /// Load every example
    fn load_examples(&self) -> Result<Vec<Example>, Self::Error>;

    /// Load every assignment row, in table order
    fn load_assignments(&self) -> Result<Vec<AssignmentRow>, Self::Error>;

    /// Append rows to the results table
    ///
    /// A single all-or-nothing commit: either every record is stored or none is.
    fn append_results(&mut self, records: &[AnswerRecord]) -> Result<(), Self::Error>;

    /// Load every persisted result, in append order
    fn load_results(&self) -> Result<Vec<AnswerRecord>, Self::Error>;

    /// Number of persisted results for a user
    fn count_results_for_user(&self, user_id: &str) -> Result<usize, Self::Error>;

    /// Load examples and assignments into a catalog
    fn load_catalog(&self) -> Result<ExampleCatalog, Self::Error> {
        Ok(ExampleCatalog::new(self.load_examples()?, self.load_assignments()?))
    }
}
