//! Read-only world data consumed by the turn rules.
//!
//! The grid oracle exposes static geometry; the RNG oracle supplies the
//! deterministic randomness constrained-mode selection draws from.
mod map;
mod rng;

pub use map::{GridOracle, GridParseError, MapDimensions, StaticGrid, TerrainKind};
pub use rng::{PcgRng, RngOracle, compute_seed};
