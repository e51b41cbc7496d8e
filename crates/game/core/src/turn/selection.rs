use crate::env::{GridOracle, RngOracle, compute_seed};
use crate::movement::{Destination, Occupancy, legal_destinations};
use crate::state::{ActorState, EntityId, Side};

const ACTOR_DRAW: u32 = 0;
const DESTINATION_DRAW: u32 = 1;

/// One actor's legal destinations for this turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveCandidate {
    pub actor: EntityId,
    pub destinations: Vec<Destination>,
}

impl MoveCandidate {
    pub fn can_capture(&self) -> bool {
        self.destinations.iter().any(|d| d.captures)
    }
}

/// The single move chosen for a constrained-mode turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstrainedMove {
    pub actor: EntityId,
    pub destination: Destination,
}

/// Legal destinations for every enemy-side actor, in collection order.
pub fn constrained_candidates<'a, G>(
    actors: impl IntoIterator<Item = &'a ActorState>,
    grid: &G,
    occupancy: &Occupancy,
) -> Vec<MoveCandidate>
where
    G: GridOracle + ?Sized,
{
    actors
        .into_iter()
        .filter(|actor| actor.side == Side::Enemy)
        .map(|actor| MoveCandidate {
            actor: actor.id,
            destinations: legal_destinations(actor, grid, occupancy),
        })
        .collect()
}

/// Picks the one actor that moves this turn, and where.
///
/// Actors without destinations are ignored. If any actor can capture, the
/// draw is restricted to capturing actors and then to their capturing
/// destinations; otherwise it is uniform over all movable actors and then over
/// the chosen actor's destinations. Returns `None` on stalemate.
pub fn select_constrained_move<R>(
    candidates: &[MoveCandidate],
    rng: &R,
    game_seed: u64,
    turn: u64,
) -> Option<ConstrainedMove>
where
    R: RngOracle + ?Sized,
{
    let movable: Vec<&MoveCandidate> = candidates
        .iter()
        .filter(|candidate| !candidate.destinations.is_empty())
        .collect();
    if movable.is_empty() {
        return None;
    }

    let capturing: Vec<&MoveCandidate> = movable
        .iter()
        .copied()
        .filter(|candidate| candidate.can_capture())
        .collect();
    let capture_only = !capturing.is_empty();
    let pool = if capture_only { capturing } else { movable };

    let chosen = pool[rng.index(compute_seed(game_seed, turn, ACTOR_DRAW), pool.len())];
    let options: Vec<Destination> = chosen
        .destinations
        .iter()
        .copied()
        .filter(|destination| !capture_only || destination.captures)
        .collect();
    let destination = options[rng.index(compute_seed(game_seed, turn, DESTINATION_DRAW), options.len())];

    Some(ConstrainedMove {
        actor: chosen.actor,
        destination,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::env::{PcgRng, StaticGrid};
    use crate::state::{Archetype, Position};

    fn quiet(x: i32, y: i32) -> Destination {
        Destination {
            position: Position::new(x, y),
            captures: false,
        }
    }

    fn capture(x: i32, y: i32) -> Destination {
        Destination {
            position: Position::new(x, y),
            captures: true,
        }
    }

    #[test]
    fn capturing_actor_and_destination_always_win() {
        let candidates = vec![
            MoveCandidate {
                actor: EntityId(1),
                destinations: vec![quiet(1, 1), capture(2, 2)],
            },
            MoveCandidate {
                actor: EntityId(2),
                destinations: vec![quiet(3, 3)],
            },
        ];

        for turn in 0..500 {
            let chosen = select_constrained_move(&candidates, &PcgRng, 11, turn).unwrap();
            assert_eq!(chosen.actor, EntityId(1));
            assert_eq!(chosen.destination, capture(2, 2));
        }
    }

    #[test]
    fn without_captures_every_movable_actor_gets_picked() {
        let candidates = vec![
            MoveCandidate {
                actor: EntityId(1),
                destinations: vec![quiet(0, 1)],
            },
            MoveCandidate {
                actor: EntityId(2),
                destinations: Vec::new(),
            },
            MoveCandidate {
                actor: EntityId(3),
                destinations: vec![quiet(4, 4), quiet(5, 5)],
            },
        ];

        let mut actors = HashSet::new();
        let mut targets = HashSet::new();
        for turn in 0..300 {
            let chosen = select_constrained_move(&candidates, &PcgRng, 3, turn).unwrap();
            actors.insert(chosen.actor);
            if chosen.actor == EntityId(3) {
                targets.insert(chosen.destination.position);
            }
        }

        assert_eq!(actors, HashSet::from([EntityId(1), EntityId(3)]));
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn no_destinations_is_a_stalemate() {
        let candidates = vec![MoveCandidate {
            actor: EntityId(1),
            destinations: Vec::new(),
        }];
        assert_eq!(select_constrained_move(&candidates, &PcgRng, 1, 1), None);
        assert_eq!(select_constrained_move(&[], &PcgRng, 1, 1), None);
    }

    #[test]
    fn selection_is_deterministic_for_a_seed_and_turn() {
        let candidates = vec![
            MoveCandidate {
                actor: EntityId(1),
                destinations: vec![quiet(0, 1), quiet(0, 2)],
            },
            MoveCandidate {
                actor: EntityId(2),
                destinations: vec![quiet(3, 3)],
            },
        ];
        let first = select_constrained_move(&candidates, &PcgRng, 77, 5);
        let second = select_constrained_move(&candidates, &PcgRng, 77, 5);
        assert_eq!(first, second);
    }

    #[test]
    fn candidates_cover_only_enemy_side() {
        let grid = StaticGrid::open(4, 4);
        let actors = vec![
            ActorState::enemy(1, Position::new(0, 0), Archetype::King),
            ActorState::new(EntityId(2), Position::new(3, 3), Archetype::King, Side::Player),
        ];
        let occupancy = Occupancy::from_actors(Position::new(2, 2), &actors);

        let candidates = constrained_candidates(&actors, &grid, &occupancy);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].actor, EntityId(1));
        assert_eq!(candidates[0].destinations.len(), 3);
    }
}
