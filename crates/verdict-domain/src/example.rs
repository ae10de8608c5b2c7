//! Example module - a claim and the evidence it is judged against

use crate::DomainError;
use std::fmt;
use std::str::FromStr;

/// Upper bound on evidence slots per example (`sentence_1..sentence_50`)
pub const MAX_EVIDENCE_SENTENCES: usize = 50;

/// Unique key of an example within the examples table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExampleId(i64);

impl ExampleId {
    /// Create an id from its raw value
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for ExampleId {
    type Err = DomainError;

    /// Parse integer-valued text, ignoring surrounding whitespace
    ///
    /// # Examples
    ///
    /// ```
    /// use verdict_domain::ExampleId;
    ///
    /// let id: ExampleId = " 7 ".parse().unwrap();
    /// assert_eq!(id.value(), 7);
    /// assert!("x".parse::<ExampleId>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidExampleId(s.to_string()))
    }
}

impl From<i64> for ExampleId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ExampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An example to be judged
///
/// Immutable once loaded. Evidence holds only the non-empty sentences, in the
/// order their slots appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// Unique identifier
    pub id: ExampleId,

    /// The claim under judgement
    pub claim: String,

    /// Ordered evidence sentences
    pub evidence: Vec<String>,
}

impl Example {
    /// Build an example from sparse sentence slots
    ///
    /// Empty and whitespace-only slots are dropped; relative order of the rest
    /// is preserved. More than [`MAX_EVIDENCE_SENTENCES`] slots is rejected.
    pub fn from_slots<I, S>(id: ExampleId, claim: impl Into<String>, slots: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots: Vec<String> = slots.into_iter().map(Into::into).collect();
        if slots.len() > MAX_EVIDENCE_SENTENCES {
            return Err(DomainError::TooManySentences {
                example_id: id.value(),
                count: slots.len(),
                max: MAX_EVIDENCE_SENTENCES,
            });
        }

        let evidence = slots
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect();

        Ok(Self {
            id,
            claim: claim.into(),
            evidence,
        })
    }

    /// Evidence paired with its 1-based display number
    pub fn numbered_evidence(&self) -> impl Iterator<Item = (usize, &str)> {
        self.evidence
            .iter()
            .enumerate()
            .map(|(idx, s)| (idx + 1, s.as_str()))
    }
}
