//! Turn orchestration on top of the animation sequencer.
//!
//! The host hands the [`TurnManager`] a [`TurnContext`] (actor collection,
//! grid, combat resolver, input gate) and calls
//! [`TurnManager::handle_turn_completion`] after every resolved player action.
//! The manager processes the enemy turn on the current thread's executor and
//! only reopens input once the last pacing delay has elapsed.
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the capability traits and error types hosts implement against
//! - [`turn`] hosts the turn manager, its phases and queue types
//! - [`events`] broadcasts turn lifecycle events
//! - [`config`] holds pacing and rule tunables
pub mod api;
pub mod config;
pub mod events;
pub mod turn;

pub use api::{
    ActorCollection, ActorMove, CombatResolver, EndOfTurnReport, InputGate, ResolveError, Result,
    RuntimeError, TurnContext,
};
pub use config::TurnConfig;
pub use events::{EventBus, SkipReason, TurnEvent};
pub use turn::{QueuedActor, TurnManager, TurnOutcome, TurnPhase, TurnSummary};
