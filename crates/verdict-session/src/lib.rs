//! Verdict Session
//!
//! The per-user state machine that walks a user through their assigned
//! examples, buffers decisions, and flushes them to the results table.
//!
//! # Overview
//!
//! | Phase | Meaning | Leaves via |
//! |-------|---------|------------|
//! | **Idle** | no user resolved yet | `login` with a known user id |
//! | **AwaitingDecision** | `current_index < example_ids.len()` | `record_decision` |
//! | **Complete** | every example answered | never (sessions are single-pass) |
//!
//! `flush` is orthogonal to the phase: it persists the buffered answers and
//! clears the buffer, leaving the cursor where it is.
//!
//! # Usage
//!
//! ```
//! use verdict_domain::{AssignmentRow, Decision, Example, ExampleCatalog, ExampleId};
//! use verdict_session::{SessionPhase, SessionState};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = ExampleCatalog::new(
//!     vec![Example::from_slots(ExampleId::new(7), "C7", ["s1", "s2"])?],
//!     vec![AssignmentRow::new("user_1", "[7]")],
//! );
//!
//! let mut session = SessionState::new();
//! assert_eq!(session.login("user_1", &catalog)?, SessionPhase::AwaitingDecision);
//!
//! session.record_decision(Decision::Support, &catalog)?;
//! assert_eq!(session.phase(), SessionPhase::Complete);
//! assert_eq!(session.answers().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Several users can be served from one process through [`SessionRegistry`],
//! which keeps an independent [`SessionState`] per user id.

#![warn(missing_docs)]

mod error;
mod registry;
mod state;

pub use error::SessionError;
pub use registry::SessionRegistry;
pub use state::{DecisionOutcome, SessionPhase, SessionState};
