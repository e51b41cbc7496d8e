//! Public runtime API surface.
//!
//! Capability traits the host implements, and the error types crossing the
//! host/runtime boundary.

pub mod context;
pub mod errors;

pub use context::{
    ActorCollection, ActorMove, CombatResolver, EndOfTurnReport, InputGate, TurnContext,
};
pub use errors::{ResolveError, Result, RuntimeError};
