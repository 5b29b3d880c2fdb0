//! Dispatcher wiring errors

use thiserror::Error;

use crate::fsm::StateId;

/// Errors raised while wiring an [`EventFilter`](crate::fsm::EventFilter).
///
/// These indicate a bug in tool construction, never a runtime condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A (state, predicate) pair already leads somewhere else
    #[error("Conflicting transition from state {state}: registered to {existing}, requested {requested}")]
    ConflictingTransition {
        state: StateId,
        existing: StateId,
        requested: StateId,
    },

    /// State id was never allocated by this filter
    #[error("Unknown state: {0}")]
    UnknownState(StateId),
}

/// Result type for dispatcher wiring
pub type Result<T> = std::result::Result<T, FilterError>;
