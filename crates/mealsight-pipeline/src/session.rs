//! In-memory session store
//!
//! Reference implementation of the
//! [`SessionStore`](mealsight_domain::SessionStore) seam for tests and
//! single-process deployments. Chat layers with real persistence provide
//! their own implementation.

use mealsight_domain::{FoodAnalysis, SessionId, SessionStore};
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Analysis delivered, corrections accepted
    Active,
    /// User confirmed the analysis; no further corrections
    Completed,
    /// User cancelled; partial state discarded
    Cancelled,
}

/// Errors from the in-memory store
#[derive(Error, Debug)]
pub enum SessionError {
    /// The session id is unknown
    #[error("Session not found: {0}")]
    NotFound(SessionId),
}

struct SessionEntry {
    analysis: FoodAnalysis,
    correction_count: u32,
    status: SessionStatus,
}

/// HashMap-backed session store
#[derive(Default)]
pub struct InMemorySessionStore {
    next_id: u64,
    sessions: HashMap<SessionId, SessionEntry>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session around a freshly delivered analysis
    pub fn open_session(&mut self, analysis: FoodAnalysis) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.insert(
            id,
            SessionEntry {
                analysis,
                correction_count: 0,
                status: SessionStatus::Active,
            },
        );
        info!("Opened {}", id);
        id
    }

    /// Mark a session confirmed by the user
    pub fn complete(&mut self, id: SessionId) -> Result<(), SessionError> {
        self.transition(id, SessionStatus::Completed)
    }

    /// Cancel a session, discarding its analysis from the active set
    pub fn cancel(&mut self, id: SessionId) -> Result<(), SessionError> {
        self.transition(id, SessionStatus::Cancelled)
    }

    /// Current lifecycle state, if the session exists
    pub fn status(&self, id: SessionId) -> Option<SessionStatus> {
        self.sessions.get(&id).map(|entry| entry.status)
    }

    fn transition(&mut self, id: SessionId, status: SessionStatus) -> Result<(), SessionError> {
        let entry = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound(id))?;
        info!("{} -> {:?}", id, status);
        entry.status = status;
        Ok(())
    }

    fn active_entry(&self, id: SessionId) -> Option<&SessionEntry> {
        self.sessions
            .get(&id)
            .filter(|entry| entry.status == SessionStatus::Active)
    }
}

impl SessionStore for InMemorySessionStore {
    type Error = SessionError;

    fn get_current_analysis(&self, id: SessionId) -> Result<Option<FoodAnalysis>, Self::Error> {
        Ok(self.active_entry(id).map(|entry| entry.analysis.clone()))
    }

    fn replace_analysis(
        &mut self,
        id: SessionId,
        analysis: FoodAnalysis,
    ) -> Result<(), Self::Error> {
        let entry = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound(id))?;
        entry.analysis = analysis;
        Ok(())
    }

    fn get_correction_count(&self, id: SessionId) -> Result<u32, Self::Error> {
        self.sessions
            .get(&id)
            .map(|entry| entry.correction_count)
            .ok_or(SessionError::NotFound(id))
    }

    fn increment_correction_count(&mut self, id: SessionId) -> Result<(), Self::Error> {
        let entry = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::NotFound(id))?;
        entry.correction_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> FoodAnalysis {
        FoodAnalysis::from_components("Soup", Vec::new())
    }

    #[test]
    fn test_open_and_read_back() {
        let mut store = InMemorySessionStore::new();
        let id = store.open_session(analysis());

        let current = store.get_current_analysis(id).unwrap();
        assert_eq!(current.unwrap().dish_name, "Soup");
        assert_eq!(store.get_correction_count(id).unwrap(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = InMemorySessionStore::new();
        let first = store.open_session(analysis());
        let second = store.open_session(analysis());
        assert_ne!(first, second);
    }

    #[test]
    fn test_cancelled_session_has_no_current_analysis() {
        let mut store = InMemorySessionStore::new();
        let id = store.open_session(analysis());
        store.cancel(id).unwrap();

        assert_eq!(store.get_current_analysis(id).unwrap(), None);
        assert_eq!(store.status(id), Some(SessionStatus::Cancelled));
    }

    #[test]
    fn test_correction_counter() {
        let mut store = InMemorySessionStore::new();
        let id = store.open_session(analysis());
        store.increment_correction_count(id).unwrap();
        store.increment_correction_count(id).unwrap();
        assert_eq!(store.get_correction_count(id).unwrap(), 2);
    }

    #[test]
    fn test_unknown_session_is_an_error() {
        let store = InMemorySessionStore::new();
        assert!(store.get_correction_count(SessionId(99)).is_err());
    }
}
