//! Failure kinds surfaced to the caller of [`Sequence::start`](crate::Sequence::start).

use thiserror::Error;

use crate::scheduler::SequenceId;

/// Error raised by an action callable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ActionError(String);

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Wraps any error, keeping only its rendered message.
    pub fn from_error(error: impl std::error::Error) -> Self {
        Self(error.to_string())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Why a sequence did not complete.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("{id} cancelled")]
    Cancelled { id: SequenceId },

    #[error("{id} aborted: {kind} step {index} failed: {source}")]
    ActionFailed {
        id: SequenceId,
        index: usize,
        kind: &'static str,
        #[source]
        source: ActionError,
    },
}

impl SequenceError {
    pub fn id(&self) -> SequenceId {
        match self {
            SequenceError::Cancelled { id } | SequenceError::ActionFailed { id, .. } => *id,
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SequenceError::Cancelled { .. })
    }
}
