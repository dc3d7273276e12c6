//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates.

use crate::FoodAnalysis;

/// Identifier for one in-progress analysis session.
///
/// Sessions are owned by the surrounding chat layer; the core only reads
/// and writes the current analysis and correction counter through
/// [`SessionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// Narrow interface onto the external collaborator's session state.
///
/// The correction loop is read-modify-write at the granularity of a whole
/// [`FoodAnalysis`] value; the caller must serialize correction requests
/// per session.
pub trait SessionStore {
    /// Error type for store operations
    type Error;

    /// Get the session's current analysis, if the session exists
    fn get_current_analysis(&self, id: SessionId) -> Result<Option<FoodAnalysis>, Self::Error>;

    /// Replace the session's current analysis wholesale
    fn replace_analysis(&mut self, id: SessionId, analysis: FoodAnalysis)
        -> Result<(), Self::Error>;

    /// How many corrections this session has already applied
    fn get_correction_count(&self, id: SessionId) -> Result<u32, Self::Error>;

    /// Record one more applied correction
    fn increment_correction_count(&mut self, id: SessionId) -> Result<(), Self::Error>;
}
