use crate::env::GridOracle;
use crate::state::{ActorState, Archetype, Position, Side};

use super::Occupancy;

const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const DIAGONAL: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];
const ALL_DIRECTIONS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];
const KNIGHT_LEAPS: [(i32, i32); 8] = [
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
];

/// A legal target square for one actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Destination {
    pub position: Position,
    /// The square holds an opposing-side actor.
    pub captures: bool,
}

impl Destination {
    fn quiet(position: Position) -> Self {
        Self {
            position,
            captures: false,
        }
    }

    fn capture(position: Position) -> Self {
        Self {
            position,
            captures: true,
        }
    }
}

/// Every square `actor` may move to under its archetype's geometry.
///
/// A square is legal only inside the grid and on passable terrain. Sweeps stop
/// at the first non-empty square, keeping it only when it holds an opponent.
pub fn legal_destinations<G>(actor: &ActorState, grid: &G, occupancy: &Occupancy) -> Vec<Destination>
where
    G: GridOracle + ?Sized,
{
    let board = Board {
        grid,
        occupancy,
        side: actor.side,
    };
    let origin = actor.position;

    match actor.archetype {
        Archetype::Pawn => board.pawn(origin),
        Archetype::Knight => board.steps(origin, &KNIGHT_LEAPS),
        Archetype::Bishop => board.sweeps(origin, &DIAGONAL),
        Archetype::Rook => board.sweeps(origin, &ORTHOGONAL),
        Archetype::Queen => board.sweeps(origin, &ALL_DIRECTIONS),
        Archetype::King => board.steps(origin, &ALL_DIRECTIONS),
    }
}

struct Board<'a, G: ?Sized> {
    grid: &'a G,
    occupancy: &'a Occupancy,
    side: Side,
}

impl<G> Board<'_, G>
where
    G: GridOracle + ?Sized,
{
    fn pawn(&self, origin: Position) -> Vec<Destination> {
        let forward = self.side.forward();
        let mut destinations = Vec::with_capacity(3);

        let ahead = origin.offset(0, forward);
        if self.grid.is_passable(ahead) && !self.occupancy.is_occupied(ahead) {
            destinations.push(Destination::quiet(ahead));
        }

        for dx in [-1, 1] {
            let diagonal = origin.offset(dx, forward);
            if self.grid.is_passable(diagonal) && self.is_opponent(diagonal) {
                destinations.push(Destination::capture(diagonal));
            }
        }

        destinations
    }

    /// Single fixed-offset moves (leaps and king steps).
    fn steps(&self, origin: Position, offsets: &[(i32, i32)]) -> Vec<Destination> {
        offsets
            .iter()
            .map(|&(dx, dy)| origin.offset(dx, dy))
            .filter(|&target| self.grid.is_passable(target))
            .filter_map(|target| match self.occupancy.side_at(target) {
                None => Some(Destination::quiet(target)),
                Some(side) if side != self.side => Some(Destination::capture(target)),
                Some(_) => None,
            })
            .collect()
    }

    fn sweeps(&self, origin: Position, directions: &[(i32, i32)]) -> Vec<Destination> {
        let mut destinations = Vec::new();

        for &(dx, dy) in directions {
            let mut target = origin.offset(dx, dy);
            while self.grid.is_passable(target) {
                match self.occupancy.side_at(target) {
                    None => destinations.push(Destination::quiet(target)),
                    Some(side) => {
                        if side != self.side {
                            destinations.push(Destination::capture(target));
                        }
                        break;
                    }
                }
                target = target.offset(dx, dy);
            }
        }

        destinations
    }

    fn is_opponent(&self, position: Position) -> bool {
        self.occupancy.side_at(position) == Some(self.side.opponent())
    }
}
