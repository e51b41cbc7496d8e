//! Deterministic turn rules shared by the runtime and offline tools.
//!
//! `game-core` defines the board vocabulary (entities, positions, sides,
//! archetypes), the grid oracle, archetype-specific legal move generation,
//! the exit-tile freeze/grace rule, and constrained-mode mover selection.
//! Everything here is synchronous and free of I/O; scheduling lives in the
//! runtime crate.
pub mod config;
pub mod env;
pub mod movement;
pub mod state;
pub mod turn;

pub use config::{GameConfig, MovementMode};
pub use env::{
    GridOracle, GridParseError, MapDimensions, PcgRng, RngOracle, StaticGrid, TerrainKind,
    compute_seed,
};
pub use movement::{Destination, Occupancy, legal_destinations};
pub use state::{ActorState, Archetype, EntityId, Position, Side};
pub use turn::{
    ConstrainedMove, FreezeState, FreezeStatus, MoveCandidate, constrained_candidates,
    select_constrained_move,
};
