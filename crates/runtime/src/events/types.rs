//! Turn lifecycle events.

use game_core::{EntityId, MovementMode};
use serde::{Deserialize, Serialize};

use crate::turn::QueuedActor;

/// Why a queued actor did not act.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Exit-tile freeze or its grace turn.
    Frozen,
    /// Removed by an earlier actor's move this turn.
    Removed,
    /// Its sequence was cancelled before resolution.
    Cancelled,
}

/// Events published while an enemy turn is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    EnemyTurnStarted {
        turn: u64,
        frozen: bool,
        show_frozen: bool,
        grace: bool,
    },

    QueueBuilt {
        turn: u64,
        mode: MovementMode,
        queue: Vec<QueuedActor>,
    },

    /// Constrained mode found no legal move for any actor.
    Stalemate { turn: u64 },

    ActorResolved { turn: u64, actor: EntityId },

    ActorSkipped {
        turn: u64,
        actor: EntityId,
        reason: SkipReason,
    },

    ActorFailed {
        turn: u64,
        actor: EntityId,
        error: String,
    },

    /// Input is open again.
    PlayerTurnRestored { turn: u64, player_struck: bool },
}

impl TurnEvent {
    pub fn turn(&self) -> u64 {
        match self {
            TurnEvent::EnemyTurnStarted { turn, .. }
            | TurnEvent::QueueBuilt { turn, .. }
            | TurnEvent::Stalemate { turn }
            | TurnEvent::ActorResolved { turn, .. }
            | TurnEvent::ActorSkipped { turn, .. }
            | TurnEvent::ActorFailed { turn, .. }
            | TurnEvent::PlayerTurnRestored { turn, .. } => *turn,
        }
    }
}
