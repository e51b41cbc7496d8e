//! Per-turn rules that decide who moves.
//!
//! - [`FreezeState`] tracks the exit-tile freeze and its one-turn grace
//! - [`select_constrained_move`] picks the single mover in constrained mode
mod freeze;
mod selection;

pub use freeze::{FreezeState, FreezeStatus};
pub use selection::{
    ConstrainedMove, MoveCandidate, constrained_candidates, select_constrained_move,
};
