use serde::{Deserialize, Serialize};

/// Who owns the board right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Input is accepted.
    #[default]
    PlayerTurn,
    /// An enemy turn has started; the queue is being built.
    EnemyTurn,
    /// Queued actors are being processed one at a time, followed by the final
    /// pacing delay.
    Draining,
}

impl TurnPhase {
    pub fn accepts_input(self) -> bool {
        self == TurnPhase::PlayerTurn
    }
}
