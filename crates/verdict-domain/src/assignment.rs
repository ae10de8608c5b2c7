//! Assignment module - which examples a user judges, and in what order

use crate::{DomainError, ExampleId};

/// Raw row of the assignments table
///
/// `example_ids` holds the unparsed bracketed list, e.g. `"[7, 3]"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    /// User the row belongs to
    pub user_id: String,

    /// Bracketed comma-separated example ids
    pub example_ids: String,
}

impl AssignmentRow {
    /// Create a new row
    pub fn new(user_id: impl Into<String>, example_ids: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            example_ids: example_ids.into(),
        }
    }
}

/// A parsed assignment
///
/// Order of `example_ids` defines presentation order for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// User the assignment belongs to
    pub user_id: String,

    /// Ordered example ids
    pub example_ids: Vec<ExampleId>,
}

impl Assignment {
    /// Strictly parse a raw assignment row
    ///
    /// Enclosing brackets are stripped, the remainder split on commas and each
    /// token trimmed and parsed as an integer. A blank list parses to no ids;
    /// any bad token fails the whole row.
    ///
    /// # Examples
    ///
    /// ```
    /// use verdict_domain::{Assignment, AssignmentRow, ExampleId};
    ///
    /// let row = AssignmentRow::new("user_1", "[7, 3]");
    /// let assignment = Assignment::parse(&row).unwrap();
    /// assert_eq!(assignment.example_ids, vec![ExampleId::new(7), ExampleId::new(3)]);
    ///
    /// assert!(Assignment::parse(&AssignmentRow::new("user_1", "[7, x]")).is_err());
    /// ```
    pub fn parse(row: &AssignmentRow) -> Result<Self, DomainError> {
        let inner = row
            .example_ids
            .trim()
            .trim_matches(|c| c == '[' || c == ']');

        if inner.trim().is_empty() {
            return Ok(Self {
                user_id: row.user_id.clone(),
                example_ids: Vec::new(),
            });
        }

        let example_ids = inner
            .split(',')
            .map(|token| {
                token.parse::<ExampleId>().map_err(|_| DomainError::MalformedAssignment {
                    user_id: row.user_id.clone(),
                    token: token.trim().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            user_id: row.user_id.clone(),
            example_ids,
        })
    }
}
