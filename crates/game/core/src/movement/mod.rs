//! Constrained-mode movement geometry.
//!
//! Legal destinations are computed per archetype from a side-tagged
//! [`Occupancy`] snapshot, so actors that already moved this turn do not
//! change what the others may do.
mod occupancy;
mod rules;

pub use occupancy::Occupancy;
pub use rules::{Destination, legal_destinations};
