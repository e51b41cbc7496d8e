mod actor;
mod common;

pub use actor::{ActorState, Archetype, Side};
pub use common::{EntityId, Position};
