//! Unified error types surfaced by the runtime API.
//!
//! [`RuntimeError`] covers turn-manager construction; [`ResolveError`] is what
//! a host's combat resolver reports for a single actor move.
use game_core::{EntityId, Position};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("invalid turn configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

/// Failure of one actor's movement/attack resolution.
///
/// Only the failing actor's sequence is aborted; the rest of the queue keeps
/// draining.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("actor {0} is no longer in the collection")]
    UnknownActor(EntityId),

    #[error("actor {actor} cannot move to {destination}")]
    Blocked {
        actor: EntityId,
        destination: Position,
    },

    #[error("{0}")]
    Other(String),
}
