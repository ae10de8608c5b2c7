//! Sessions keyed by user id

use crate::{SessionError, SessionState};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;
use verdict_domain::ExampleCatalog;

/// Independent sessions for every user seen by this process
///
/// Each user owns their own cursor and answer buffer. Nothing is shared
/// between entries and no locking is attempted; concurrent flushes from
/// different users simply append separate batches.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, SessionState>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or resolve the session for a user
    ///
    /// Returns `Ok(None)` for an empty or whitespace-only id. A session is only stored once its
    /// login succeeds, so unknown or malformed users leave no entry behind.
    /// Logging in again returns the existing session unchanged.
    pub fn login(
        &mut self,
        user_id: &str,
        catalog: &ExampleCatalog,
    ) -> Result<Option<&mut SessionState>, SessionError> {
        if user_id.trim().is_empty() {
            return Ok(None);
        }

        match self.sessions.entry(user_id.to_string()) {
            Entry::Occupied(entry) => {
                let session = entry.into_mut();
                session.login(user_id, catalog)?;
                debug!(user_id, "Resumed in-memory session");
                Ok(Some(session))
            }
            Entry::Vacant(entry) => {
                let mut session = SessionState::new();
                session.login(user_id, catalog)?;
                Ok(Some(entry.insert(session)))
            }
        }
    }

    /// Session for a user, if one was resolved
    pub fn get(&self, user_id: &str) -> Option<&SessionState> {
        self.sessions.get(user_id)
    }

    /// Mutable session for a user, if one was resolved
    pub fn get_mut(&mut self, user_id: &str) -> Option<&mut SessionState> {
        self.sessions.get_mut(user_id)
    }

    /// Users holding answers that have not been flushed, sorted
    pub fn pending_users(&self) -> Vec<&str> {
        let mut users: Vec<&str> = self
            .sessions
            .iter()
            .filter(|(_, session)| session.has_pending_answers())
            .map(|(user_id, _)| user_id.as_str())
            .collect();
        users.sort_unstable();
        users
    }

    /// Number of resolved sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session has been resolved
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
