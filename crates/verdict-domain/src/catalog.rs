//! Example catalog - the read-only survey data loaded once at startup

use crate::{AssignmentRow, Example, ExampleId};
use std::collections::HashMap;

/// Examples keyed by id plus the raw assignment table
///
/// Assignment rows stay unparsed so that one corrupt row only fails the user
/// it belongs to.
#[derive(Debug, Clone, Default)]
pub struct ExampleCatalog {
    examples: HashMap<ExampleId, Example>,
    assignments: Vec<AssignmentRow>,
}

impl ExampleCatalog {
    /// Build a catalog from loaded tables
    ///
    /// Later examples with a duplicate id replace earlier ones.
    pub fn new(examples: Vec<Example>, assignments: Vec<AssignmentRow>) -> Self {
        let examples = examples.into_iter().map(|e| (e.id, e)).collect();
        Self {
            examples,
            assignments,
        }
    }

    /// Look up an example
    pub fn example(&self, id: ExampleId) -> Option<&Example> {
        self.examples.get(&id)
    }

    /// First assignment row whose user id matches exactly (case-sensitive)
    pub fn find_assignment(&self, user_id: &str) -> Option<&AssignmentRow> {
        self.assignments.iter().find(|row| row.user_id == user_id)
    }

    /// Number of examples
    pub fn example_count(&self) -> usize {
        self.examples.len()
    }

    /// Number of assignment rows
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ExampleCatalog {
        ExampleCatalog::new(
            vec![Example::from_slots(ExampleId::new(7), "C7", ["s1", "s2"]).unwrap()],
            vec![
                AssignmentRow::new("user_1", "[7]"),
                AssignmentRow::new("user_1", "[99]"),
                AssignmentRow::new("User_2", "[7]"),
            ],
        )
    }

    #[test]
    fn test_first_matching_assignment_wins() {
        let catalog = catalog();
        assert_eq!(catalog.find_assignment("user_1").unwrap().example_ids, "[7]");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let catalog = catalog();
        assert!(catalog.find_assignment("user_2").is_none());
        assert!(catalog.find_assignment("User_2").is_some());
    }

    #[test]
    fn test_example_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.example(ExampleId::new(7)).unwrap().claim, "C7");
        assert!(catalog.example(ExampleId::new(3)).is_none());
        assert_eq!(catalog.example_count(), 1);
        assert_eq!(catalog.assignment_count(), 3);
    }
}
