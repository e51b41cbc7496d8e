//! Enemy-turn control loop.
//!
//! [`TurnManager`] flips the board to the enemies once per resolved player
//! action, builds the turn queue (normal or constrained mode), and drains it
//! one actor at a time through the animation scheduler before reopening input.
mod manager;
mod phase;
mod queue;

pub use manager::TurnManager;
pub use phase::TurnPhase;
pub use queue::{QueuedActor, TurnOutcome, TurnSummary};
