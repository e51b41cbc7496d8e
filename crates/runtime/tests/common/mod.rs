//! In-memory host used by the turn manager integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use animation_sequencer::{AnimationScheduler, HostClock, TokioHost};
use game_core::{ActorState, Archetype, EntityId, GridOracle, Position, StaticGrid};
use runtime::{
    ActorCollection, ActorMove, CombatResolver, EndOfTurnReport, InputGate, ResolveError,
    TurnConfig, TurnContext, TurnEvent, TurnManager, TurnPhase,
};
use tokio::sync::broadcast;
use tokio::time::Instant;

pub struct TestBoard {
    pub grid: StaticGrid,
    pub player: Position,
    pub actors: Vec<ActorState>,
    /// Move actors to their constrained destination when resolved.
    pub apply_moves: bool,
    pub fail_on: HashSet<EntityId>,
    /// Resolving the key removes the value from the board.
    pub removes: HashMap<EntityId, EntityId>,
    pub strike_player: bool,

    pub resolved: Vec<(EntityId, Option<Position>, Instant)>,
    pub end_of_turn_calls: usize,
    pub input_cancels: usize,
    pub phases: Vec<TurnPhase>,
}

impl TestBoard {
    pub fn new(grid: StaticGrid, player: Position, actors: Vec<ActorState>) -> Self {
        Self {
            grid,
            player,
            actors,
            apply_moves: false,
            fail_on: HashSet::new(),
            removes: HashMap::new(),
            strike_player: false,
            resolved: Vec::new(),
            end_of_turn_calls: 0,
            input_cancels: 0,
            phases: Vec::new(),
        }
    }

    /// `count` pawns along the top row of an open 8x8 board, player at the bottom.
    pub fn with_pawns(count: u32) -> Self {
        let actors = (1..=count)
            .map(|id| ActorState::enemy(id, Position::new(id as i32 - 1, 0), Archetype::Pawn))
            .collect();
        Self::new(StaticGrid::open(8, 8), Position::new(4, 7), actors)
    }

    pub fn resolved_ids(&self) -> Vec<EntityId> {
        self.resolved.iter().map(|(id, _, _)| *id).collect()
    }
}

impl ActorCollection for TestBoard {
    fn actors(&self) -> Vec<ActorState> {
        self.actors.clone()
    }

    fn player_position(&self) -> Position {
        self.player
    }
}

impl CombatResolver for TestBoard {
    fn resolve_actor(&mut self, mut actor_move: ActorMove<'_>) -> Result<(), ResolveError> {
        let id = actor_move.actor.id;
        self.resolved.push((id, actor_move.destination, Instant::now()));

        if self.fail_on.contains(&id) {
            return Err(ResolveError::Other(format!("{id} tripped")));
        }
        if let Some(victim) = self.removes.get(&id).copied() {
            self.actors.retain(|actor| actor.id != victim);
        }
        if self.apply_moves
            && let Some(destination) = actor_move.destination
        {
            if !actor_move.claim(destination) && destination != self.player {
                return Err(ResolveError::Blocked {
                    actor: id,
                    destination,
                });
            }
            if let Some(actor) = self.actors.iter_mut().find(|actor| actor.id == id) {
                actor.position = destination;
            }
        }
        Ok(())
    }

    fn resolve_end_of_turn(&mut self) -> EndOfTurnReport {
        self.end_of_turn_calls += 1;
        EndOfTurnReport {
            player_struck: self.strike_player,
            pickups: 0,
        }
    }
}

impl InputGate for TestBoard {
    fn cancel_pending_input(&mut self) {
        self.input_cancels += 1;
    }

    fn on_phase_changed(&mut self, phase: TurnPhase) {
        self.phases.push(phase);
    }
}

impl TurnContext for TestBoard {
    fn grid(&self) -> &dyn GridOracle {
        &self.grid
    }
}

pub fn manager(board: TestBoard, config: TurnConfig) -> TurnManager<TestBoard> {
    let host: Rc<dyn HostClock> = Rc::new(TokioHost::new());
    TurnManager::new(
        Rc::new(RefCell::new(board)),
        AnimationScheduler::new(host),
        config,
    )
    .unwrap()
}

pub fn drain(rx: &mut broadcast::Receiver<TurnEvent>) -> Vec<TurnEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
