use super::common::{EntityId, Position};

/// Allegiance on the board. Captures only ever target the opposing side.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    /// The player and anything fighting alongside them.
    Player,
    /// Non-player actors that move during the enemy turn.
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Row delta of one forward step. The two sides face each other.
    pub fn forward(self) -> i32 {
        match self {
            Side::Player => -1,
            Side::Enemy => 1,
        }
    }
}

/// Movement archetype used by constrained mode.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Archetype {
    /// One step forward; captures one step diagonally forward.
    Pawn,
    /// Eight L-shaped leaps.
    Knight,
    /// Diagonal sweeps.
    Bishop,
    /// Orthogonal sweeps.
    Rook,
    /// Sweeps in all eight directions.
    Queen,
    /// One step in any of the eight directions.
    King,
}

/// Snapshot of a non-player actor as seen by the turn rules.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: EntityId,
    pub position: Position,
    pub archetype: Archetype,
    pub side: Side,
}

impl ActorState {
    pub fn new(id: EntityId, position: Position, archetype: Archetype, side: Side) -> Self {
        Self {
            id,
            position,
            archetype,
            side,
        }
    }

    /// Shorthand for an enemy-side actor.
    pub fn enemy(id: u32, position: Position, archetype: Archetype) -> Self {
        Self::new(EntityId(id), position, archetype, Side::Enemy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_is_mirrored_between_sides() {
        assert_eq!(Side::Player.forward(), -Side::Enemy.forward());
        assert_eq!(Side::Enemy.opponent(), Side::Player);
    }

    #[test]
    fn archetype_round_trips_through_strings() {
        assert_eq!("knight".parse::<Archetype>().ok(), Some(Archetype::Knight));
        assert_eq!(Archetype::Queen.as_ref(), "queen");
    }
}
