//! Answer records - decisions as they are persisted

use crate::{Decision, ExampleId};

/// Column order of the results table
pub const RESULT_COLUMNS: [&str; 5] = ["user_id", "example_id", "claim", "decision", "timestamp"];

/// A captured decision
///
/// Immutable once created. `claim` is copied from the example at decision time
/// and never re-fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    /// User who made the decision
    pub user_id: String,

    /// Example the decision is about
    pub example_id: ExampleId,

    /// Claim text at decision time
    pub claim: String,

    /// The verdict
    pub decision: Decision,

    /// Capture time, milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl AnswerRecord {
    /// The five fields as text, in [`RESULT_COLUMNS`] order
    pub fn to_row(&self) -> [String; 5] {
        [
            self.user_id.clone(),
            self.example_id.to_string(),
            self.claim.clone(),
            self.decision.as_str().to_string(),
            self.timestamp.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_order_matches_columns() {
        let record = AnswerRecord {
            user_id: "user_1".to_string(),
            example_id: ExampleId::new(7),
            claim: "C7".to_string(),
            decision: Decision::Support,
            timestamp: 1_700_000_000_000,
        };

        let row = record.to_row();
        assert_eq!(RESULT_COLUMNS[0], "user_id");
        assert_eq!(row, ["user_1", "7", "C7", "support", "1700000000000"]);
    }
}
