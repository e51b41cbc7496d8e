//! Board vocabulary shared by rules and runtime.
//!
//! The authoritative actor collection and grid belong to the host; these
//! types are the snapshots the turn rules reason about.
pub mod types;

pub use types::{ActorState, Archetype, EntityId, Position, Side};
