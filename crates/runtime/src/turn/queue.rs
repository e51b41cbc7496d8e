use game_core::{
    EntityId, GameConfig, MovementMode, Occupancy, PcgRng, Position, constrained_candidates,
    select_constrained_move,
};
use serde::{Deserialize, Serialize};

use crate::api::TurnContext;

/// One entry of the turn queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedActor {
    pub id: EntityId,
    /// Set in constrained mode; the resolver moves the actor exactly here.
    pub destination: Option<Position>,
}

impl QueuedActor {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            destination: None,
        }
    }
}

/// Totals for one processed enemy turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    pub turn: u64,
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub player_struck: bool,
    /// The turn was cut short by [`TurnManager::abort_turn`](crate::TurnManager::abort_turn).
    pub aborted: bool,
}

impl TurnSummary {
    pub fn new(turn: u64) -> Self {
        Self {
            turn,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A turn was already in progress; the trigger was discarded.
    Ignored,
    Completed(TurnSummary),
}

impl TurnOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, TurnOutcome::Ignored)
    }

    pub fn summary(&self) -> Option<&TurnSummary> {
        match self {
            TurnOutcome::Ignored => None,
            TurnOutcome::Completed(summary) => Some(summary),
        }
    }
}

/// Builds this turn's queue. `None` means a constrained-mode stalemate.
pub(crate) fn plan_queue<C>(context: &C, game: &GameConfig, turn: u64) -> Option<Vec<QueuedActor>>
where
    C: TurnContext + ?Sized,
{
    let actors = context.actors();

    match game.movement_mode {
        MovementMode::Normal => Some(actors.iter().map(|actor| QueuedActor::new(actor.id)).collect()),
        MovementMode::Constrained => {
            let occupancy = Occupancy::from_actors(context.player_position(), &actors);
            let candidates = constrained_candidates(&actors, context.grid(), &occupancy);

            select_constrained_move(&candidates, &PcgRng, game.game_seed, turn).map(|chosen| {
                vec![QueuedActor {
                    id: chosen.actor,
                    destination: Some(chosen.destination.position),
                }]
            })
        }
    }
}
