//! Scripted demo board used by the headless client.
//!
//! Enemies chase the player one tile at a time in normal mode and follow the
//! selected destination in constrained mode. The player walks a fixed route
//! that crosses the exit tile, so the freeze and grace turns show up in the
//! log.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::mem;

use game_core::{
    ActorState, Archetype, GridOracle, GridParseError, Position, StaticGrid, TerrainKind,
};
use runtime::{
    ActorCollection, ActorMove, CombatResolver, EndOfTurnReport, InputGate, ResolveError,
    TurnContext, TurnPhase,
};
use tracing::{debug, trace};

const LAYOUT: &str = "\
##########
#........#
#..#..#..#
#........#
#...E....#
#..#..#..#
#........#
##########";

const ROUTE: &[Position] = &[
    Position::new(2, 6),
    Position::new(3, 6),
    Position::new(4, 5),
    Position::new(4, 4),
    Position::new(5, 4),
    Position::new(6, 4),
    Position::new(7, 3),
    Position::new(7, 2),
];

pub struct DemoBoard {
    grid: StaticGrid,
    player: Position,
    route_step: usize,
    enemies: Vec<ActorState>,
    player_struck: bool,
    pending_gesture: bool,
    hits_taken: u32,
}

impl DemoBoard {
    pub fn new() -> Result<Self, GridParseError> {
        let grid = StaticGrid::parse(LAYOUT)?;
        let enemies = vec![
            ActorState::enemy(1, Position::new(1, 1), Archetype::Pawn),
            ActorState::enemy(2, Position::new(8, 1), Archetype::Knight),
            ActorState::enemy(3, Position::new(5, 1), Archetype::Bishop),
            ActorState::enemy(4, Position::new(8, 6), Archetype::Rook),
        ];

        Ok(Self {
            grid,
            player: ROUTE[0],
            route_step: 0,
            enemies,
            player_struck: false,
            pending_gesture: false,
            hits_taken: 0,
        })
    }

    /// Applies the next scripted player action.
    pub fn advance_player(&mut self) -> Position {
        self.route_step = (self.route_step + 1) % ROUTE.len();
        self.player = ROUTE[self.route_step];
        // A swipe that would fire after the turn has already been handed over.
        self.pending_gesture = true;
        self.player
    }

    /// The route starts over on the next floor.
    pub fn route_wrapped(&self) -> bool {
        self.route_step == 0
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn hits_taken(&self) -> u32 {
        self.hits_taken
    }

    pub fn render(&self) -> String {
        let dims = self.grid.dimensions();
        let mut out = String::new();
        for y in 0..dims.height as i32 {
            for x in 0..dims.width as i32 {
                let position = Position::new(x, y);
                let glyph = if position == self.player {
                    '@'
                } else if let Some(actor) = self.actor_at(position) {
                    archetype_glyph(actor.archetype)
                } else {
                    terrain_glyph(self.grid.tile(position))
                };
                out.push(glyph);
            }
            let _ = writeln!(out);
        }
        out
    }

    /// One chasing step towards the player, or `None` when boxed in.
    fn chase_step(&self, actor: &ActorState, occupied: &HashSet<Position>) -> Option<Position> {
        let dx = (self.player.x - actor.position.x).signum();
        let dy = (self.player.y - actor.position.y).signum();

        [(dx, dy), (dx, 0), (0, dy)]
            .into_iter()
            .filter(|&(x, y)| (x, y) != (0, 0))
            .map(|(x, y)| actor.position.offset(x, y))
            .find(|&next| {
                next == self.player || (self.grid.is_passable(next) && !occupied.contains(&next))
            })
    }

    fn move_enemy(&mut self, actor: &ActorState, target: Position) {
        if target == self.player {
            debug!(actor = %actor.id, "player struck");
            self.player_struck = true;
            return;
        }
        if let Some(enemy) = self.enemies.iter_mut().find(|e| e.id == actor.id) {
            enemy.position = target;
        }
    }
}

impl ActorCollection for DemoBoard {
    fn actors(&self) -> Vec<ActorState> {
        self.enemies.clone()
    }

    fn player_position(&self) -> Position {
        self.player
    }
}

impl CombatResolver for DemoBoard {
    fn resolve_actor(&mut self, mut actor_move: ActorMove<'_>) -> Result<(), ResolveError> {
        let actor = actor_move.actor.clone();

        let target = match actor_move.destination {
            Some(destination) => Some(destination),
            None => self.chase_step(&actor, actor_move.occupied),
        };
        let Some(target) = target else {
            trace!(actor = %actor.id, "no step available");
            actor_move.claim(actor.position);
            return Ok(());
        };

        if target != self.player && !actor_move.claim(target) {
            return Err(ResolveError::Blocked {
                actor: actor.id,
                destination: target,
            });
        }
        self.move_enemy(&actor, target);
        Ok(())
    }

    fn resolve_end_of_turn(&mut self) -> EndOfTurnReport {
        let player_struck = mem::take(&mut self.player_struck);
        if player_struck {
            self.hits_taken += 1;
        }
        EndOfTurnReport {
            player_struck,
            pickups: 0,
        }
    }
}

impl InputGate for DemoBoard {
    fn cancel_pending_input(&mut self) {
        if mem::take(&mut self.pending_gesture) {
            trace!("pending gesture dropped");
        }
    }

    fn on_phase_changed(&mut self, phase: TurnPhase) {
        trace!(?phase, "turn phase");
    }
}

impl TurnContext for DemoBoard {
    fn grid(&self) -> &dyn GridOracle {
        &self.grid
    }
}

fn archetype_glyph(archetype: Archetype) -> char {
    match archetype {
        Archetype::Pawn => 'p',
        Archetype::Knight => 'n',
        Archetype::Bishop => 'b',
        Archetype::Rook => 'r',
        Archetype::Queen => 'q',
        Archetype::King => 'k',
    }
}

fn terrain_glyph(tile: Option<TerrainKind>) -> char {
    match tile {
        Some(TerrainKind::Floor) => '.',
        Some(TerrainKind::Wall) => '#',
        Some(TerrainKind::Water) => '~',
        Some(TerrainKind::Exit) => 'E',
        Some(TerrainKind::Void) | None => ' ',
    }
}
