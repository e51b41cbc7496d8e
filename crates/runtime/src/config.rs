//! Turn pacing and rule configuration.

use std::time::Duration;

use game_core::{GameConfig, MovementMode};
use serde::{Deserialize, Serialize};

use crate::api::{Result, RuntimeError};
use crate::events::EventBus;

/// Tunables for the enemy-turn loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnConfig {
    pub game: GameConfig,
    /// Pause after an actor that moved, so each move reads on its own.
    pub move_pacing: Duration,
    /// Pause after an actor that had nothing to animate.
    pub frozen_pacing: Duration,
    /// Final pause before input reopens.
    pub final_pacing: Duration,
    /// Final pause when the player was struck, long enough for the hit animation.
    pub hit_pacing: Duration,
    pub event_buffer_size: usize,
}

impl TurnConfig {
    pub const DEFAULT_MOVE_PACING: Duration = Duration::from_millis(600);
    pub const DEFAULT_FROZEN_PACING: Duration = Duration::from_millis(50);
    pub const DEFAULT_FINAL_PACING: Duration = Duration::from_millis(200);
    pub const DEFAULT_HIT_PACING: Duration = Duration::from_millis(700);

    /// Defaults with a freshly drawn game seed.
    pub fn random_seed() -> Self {
        let mut config = Self::default();
        config.game.game_seed = rand::random();
        config
    }

    pub fn with_movement_mode(mut self, mode: MovementMode) -> Self {
        self.game.movement_mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.game.game_seed = seed;
        self
    }

    pub fn movement_mode(&self) -> MovementMode {
        self.game.movement_mode
    }

    pub fn final_pacing_for(&self, player_struck: bool) -> Duration {
        if player_struck {
            self.hit_pacing
        } else {
            self.final_pacing
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(RuntimeError::InvalidConfig {
                field: "event_buffer_size",
                reason: "must be at least 1",
            });
        }
        if self.move_pacing < self.frozen_pacing {
            return Err(RuntimeError::InvalidConfig {
                field: "move_pacing",
                reason: "must not be shorter than frozen_pacing",
            });
        }
        Ok(())
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            move_pacing: Self::DEFAULT_MOVE_PACING,
            frozen_pacing: Self::DEFAULT_FROZEN_PACING,
            final_pacing: Self::DEFAULT_FINAL_PACING,
            hit_pacing: Self::DEFAULT_HIT_PACING,
            event_buffer_size: EventBus::DEFAULT_CAPACITY,
        }
    }
}
