//! Capabilities the turn manager needs from the host game state.
//!
//! The host owns the actor collection and grid; the turn manager only reads
//! them, and calls back into the resolver and input gate at fixed points of
//! the turn.
use std::collections::HashSet;

use game_core::{ActorState, EntityId, GridOracle, Position};

use super::errors::ResolveError;
use crate::turn::TurnPhase;

/// Read access to the non-player actors on the board.
pub trait ActorCollection {
    /// Every non-player actor, in collection order.
    fn actors(&self) -> Vec<ActorState>;

    fn player_position(&self) -> Position;

    fn actor(&self, id: EntityId) -> Option<ActorState> {
        self.actors().into_iter().find(|actor| actor.id == id)
    }

    fn contains(&self, id: EntityId) -> bool {
        self.actor(id).is_some()
    }

    fn actor_at(&self, position: Position) -> Option<ActorState> {
        self.actors()
            .into_iter()
            .find(|actor| actor.position == position)
    }

    /// Tiles held by any actor, the player included.
    fn occupied_positions(&self) -> HashSet<Position> {
        let mut occupied: HashSet<Position> =
            self.actors().iter().map(|actor| actor.position).collect();
        occupied.insert(self.player_position());
        occupied
    }
}

/// One actor's move as handed to the resolver.
#[derive(Debug)]
pub struct ActorMove<'a> {
    /// Snapshot taken right before resolution.
    pub actor: ActorState,
    /// Target chosen by constrained-mode selection; `None` in normal mode.
    pub destination: Option<Position>,
    /// Tiles claimed so far this turn, seeded with the player's tile.
    pub occupied: &'a mut HashSet<Position>,
    /// Enemy tiles as they were when the turn started.
    pub initial_enemy_tiles: &'a HashSet<Position>,
}

impl ActorMove<'_> {
    /// Claims `position` for the rest of the turn. Returns `false` if it was
    /// already claimed.
    pub fn claim(&mut self, position: Position) -> bool {
        self.occupied.insert(position)
    }
}

/// What collision/pickup resolution reports once the queue is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndOfTurnReport {
    pub player_struck: bool,
    pub pickups: usize,
}

/// Movement, attack and end-of-turn resolution. Runs synchronously inside the
/// acting sequence's step.
pub trait CombatResolver {
    fn resolve_actor(&mut self, actor_move: ActorMove<'_>) -> Result<(), ResolveError>;

    fn resolve_end_of_turn(&mut self) -> EndOfTurnReport;
}

/// Hooks into the host's input handling.
pub trait InputGate {
    /// Drops any delayed input (gesture timers etc.) that has not fired yet.
    fn cancel_pending_input(&mut self);

    fn on_phase_changed(&mut self, _phase: TurnPhase) {}
}

/// Everything the turn manager is allowed to touch.
pub trait TurnContext: ActorCollection + CombatResolver + InputGate {
    fn grid(&self) -> &dyn GridOracle;
}
