/// Rule variant controlling how many actors move per turn.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MovementMode {
    /// Every eligible actor acts, in collection order.
    #[default]
    Normal,
    /// Exactly one opposing actor moves per turn, using archetype geometry.
    Constrained,
}

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    pub movement_mode: MovementMode,
    /// Base seed for constrained-mode selection. Same seed, same choices.
    pub game_seed: u64,
}

impl GameConfig {
    pub const DEFAULT_GAME_SEED: u64 = 0x5eed;

    pub fn new() -> Self {
        Self {
            movement_mode: MovementMode::default(),
            game_seed: Self::DEFAULT_GAME_SEED,
        }
    }

    pub fn with_movement_mode(mut self, movement_mode: MovementMode) -> Self {
        self.movement_mode = movement_mode;
        self
    }

    pub fn with_seed(mut self, game_seed: u64) -> Self {
        self.game_seed = game_seed;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
