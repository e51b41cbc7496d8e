use std::collections::HashMap;

use crate::state::{ActorState, Position, Side};

/// Side-tagged snapshot of occupied tiles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Occupancy {
    tiles: HashMap<Position, Side>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with the player plus every actor in the collection.
    pub fn from_actors<'a>(
        player: Position,
        actors: impl IntoIterator<Item = &'a ActorState>,
    ) -> Self {
        let mut occupancy = Self::new();
        occupancy.insert(player, Side::Player);
        for actor in actors {
            occupancy.insert(actor.position, actor.side);
        }
        occupancy
    }

    pub fn insert(&mut self, position: Position, side: Side) {
        self.tiles.insert(position, side);
    }

    pub fn side_at(&self, position: Position) -> Option<Side> {
        self.tiles.get(&position).copied()
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.tiles.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
