//! Decision module - the three verdicts a user can give

use crate::DomainError;
use std::fmt;
use std::str::FromStr;

/// A user's verdict on one example
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// The evidence fully supports the claim
    Support,

    /// At least one evidence sentence contradicts the claim
    Refute,

    /// The evidence is insufficient or unclear
    CannotDecide,
}

impl Decision {
    /// All decisions, in display order
    pub const ALL: [Decision; 3] = [Decision::Support, Decision::Refute, Decision::CannotDecide];

    /// Canonical stored form
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Support => "support",
            Decision::Refute => "refute",
            Decision::CannotDecide => "cannot_decide",
        }
    }

    /// Label shown on the decision control
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Support => "Support",
            Decision::Refute => "Refute",
            Decision::CannotDecide => "Can't Decide",
        }
    }
}

impl FromStr for Decision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "support" => Ok(Decision::Support),
            "refute" => Ok(Decision::Refute),
            "cannot_decide" => Ok(Decision::CannotDecide),
            _ => Err(DomainError::InvalidDecision(s.to_string())),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
