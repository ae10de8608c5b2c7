//! Core session state machine

use crate::SessionError;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info, warn};
use verdict_domain::{AnswerRecord, Assignment, Decision, Example, ExampleCatalog, ExampleId, SurveyStore};

/// Current timestamp in milliseconds since Unix epoch
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Where a session is in its traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No user resolved yet
    Idle,

    /// An example is waiting for a decision
    AwaitingDecision,

    /// Every assigned example has been answered
    Complete,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingDecision => write!(f, "awaiting decision"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Result of a decision call that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The decision was buffered and the cursor advanced
    Recorded {
        /// Example the decision was recorded for
        example_id: ExampleId,
        /// Phase after the transition
        phase: SessionPhase,
    },

    /// The session was Idle or Complete; nothing changed
    Ignored,

    /// The decision was bound to an example that is no longer current; nothing changed
    Stale {
        /// The example the decision was meant for
        requested: ExampleId,
        /// The example actually current, if any
        current: Option<ExampleId>,
    },
}

/// The user and example sequence a session was resolved for; frozen once set
#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    user_id: String,
    example_ids: Vec<ExampleId>,
}

/// Per-user survey session
///
/// Owns the traversal cursor and the buffer of unsaved answers. Lives only in
/// memory; answers survive the process only once [`SessionState::flush`]
/// succeeds.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    binding: Option<Binding>,
    current_index: usize,
    answers: Vec<AnswerRecord>,
    /// Latest timestamp handed out, so stamps never go backwards across flushes
    last_timestamp: u64,
}

impl SessionState {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the user's assignment and freeze the example sequence
    ///
    /// An empty or whitespace-only id leaves the session idle. Resolution is a one-time latch:
    /// logging in again with the same id changes nothing, and a different id
    /// is rejected with [`SessionError::AlreadyBound`]. On any error the
    /// session is left untouched.
    pub fn login(&mut self, user_id: &str, catalog: &ExampleCatalog) -> Result<SessionPhase, SessionError> {
        if user_id.trim().is_empty() {
            return Ok(self.phase());
        }

        if let Some(binding) = &self.binding {
            if binding.user_id == user_id {
                debug!(user_id, "Session already resolved");
                return Ok(self.phase());
            }
            return Err(SessionError::AlreadyBound {
                bound: binding.user_id.clone(),
                requested: user_id.to_string(),
            });
        }

        let row = catalog
            .find_assignment(user_id)
            .ok_or_else(|| SessionError::UserNotFound(user_id.to_string()))?;
        let assignment = Assignment::parse(row)?;

        info!(
            user_id,
            examples = assignment.example_ids.len(),
            "Resolved assignment"
        );

        self.binding = Some(Binding {
            user_id: assignment.user_id,
            example_ids: assignment.example_ids,
        });

        Ok(self.phase())
    }

    /// Current phase of the traversal
    pub fn phase(&self) -> SessionPhase {
        match &self.binding {
            None => SessionPhase::Idle,
            Some(binding) if self.current_index < binding.example_ids.len() => SessionPhase::AwaitingDecision,
            Some(_) => SessionPhase::Complete,
        }
    }

    /// User the session is bound to
    pub fn user_id(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.user_id.as_str())
    }

    /// The frozen example sequence (empty while idle)
    pub fn example_ids(&self) -> &[ExampleId] {
        self.binding
            .as_ref()
            .map(|b| b.example_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Cursor into the example sequence
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Buffered answers not yet flushed
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Whether the finish action should be offered
    pub fn has_pending_answers(&self) -> bool {
        !self.answers.is_empty()
    }

    /// `(answered, total)` for progress display
    pub fn progress(&self) -> (usize, usize) {
        (self.current_index, self.example_ids().len())
    }

    /// Id of the example awaiting a decision
    pub fn current_example_id(&self) -> Option<ExampleId> {
        self.example_ids().get(self.current_index).copied()
    }

    /// The example awaiting a decision, looked up in the catalog
    pub fn current_example<'a>(&self, catalog: &'a ExampleCatalog) -> Result<Option<&'a Example>, SessionError> {
        match self.current_example_id() {
            None => Ok(None),
            Some(id) => catalog
                .example(id)
                .map(Some)
                .ok_or(SessionError::ExampleNotFound(id)),
        }
    }

    /// Record a decision for the current example, stamped with the wall clock
    pub fn record_decision(
        &mut self,
        decision: Decision,
        catalog: &ExampleCatalog,
    ) -> Result<DecisionOutcome, SessionError> {
        self.record_decision_at(decision, catalog, current_timestamp())
    }

    /// Record a decision given in its stored text form
    pub fn record_decision_str(
        &mut self,
        decision: &str,
        catalog: &ExampleCatalog,
    ) -> Result<DecisionOutcome, SessionError> {
        let decision: Decision = decision.parse()?;
        self.record_decision(decision, catalog)
    }

    /// Record a decision that was offered for a specific example
    ///
    /// If that example is no longer current the call is stale and changes
    /// nothing, so a control rendered for one example can never answer the next.
    pub fn record_decision_for(
        &mut self,
        example_id: ExampleId,
        decision: Decision,
        catalog: &ExampleCatalog,
    ) -> Result<DecisionOutcome, SessionError> {
        let current = self.current_example_id();
        if current != Some(example_id) {
            warn!(requested = %example_id, current = ?current, "Ignoring stale decision");
            return Ok(DecisionOutcome::Stale {
                requested: example_id,
                current,
            });
        }
        self.record_decision(decision, catalog)
    }

    /// Record a decision with an explicit capture time (milliseconds since epoch)
    ///
    /// Buffers an answer carrying the example's claim and advances the cursor
    /// by one. Idle and Complete sessions ignore the call. Timestamps earlier
    /// than one already issued are raised to it.
    pub fn record_decision_at(
        &mut self,
        decision: Decision,
        catalog: &ExampleCatalog,
        timestamp: u64,
    ) -> Result<DecisionOutcome, SessionError> {
        let Some(binding) = &self.binding else {
            warn!("Decision received before login; ignoring");
            return Ok(DecisionOutcome::Ignored);
        };
        let Some(&example_id) = binding.example_ids.get(self.current_index) else {
            warn!(user_id = %binding.user_id, "Decision received after completion; ignoring");
            return Ok(DecisionOutcome::Ignored);
        };

        let example = catalog
            .example(example_id)
            .ok_or(SessionError::ExampleNotFound(example_id))?;

        let timestamp = timestamp.max(self.last_timestamp);
        self.answers.push(AnswerRecord {
            user_id: binding.user_id.clone(),
            example_id,
            claim: example.claim.clone(),
            decision,
            timestamp,
        });
        self.last_timestamp = timestamp;
        self.current_index += 1;

        let phase = self.phase();
        info!(
            example_id = %example_id,
            decision = %decision,
            index = self.current_index,
            %phase,
            "Recorded decision"
        );

        Ok(DecisionOutcome::Recorded { example_id, phase })
    }

    /// Persist every buffered answer with a single append
    ///
    /// Returns the number of rows written; an empty buffer writes nothing and
    /// returns 0. On failure the buffer is left exactly as it was so the call
    /// can be retried. The cursor is never reset.
    pub fn flush<S: SurveyStore>(&mut self, store: &mut S) -> Result<usize, SessionError>
    where
        S::Error: std::fmt::Display,
    {
        if self.answers.is_empty() {
            debug!("Nothing to flush");
            return Ok(0);
        }

        if let Err(e) = store.append_results(&self.answers) {
            error!(pending = self.answers.len(), "Flush failed: {}", e);
            return Err(SessionError::Persistence(e.to_string()));
        }

        let count = self.answers.len();
        self.answers.clear();
        info!(user_id = self.user_id().unwrap_or_default(), count, "Flushed answers");
        Ok(count)
    }
}
