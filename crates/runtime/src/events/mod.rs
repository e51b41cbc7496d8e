//! Turn events published by the turn manager.
//!
//! Hosts subscribe to drive rendering (frozen indicators, hit flashes) and
//! logging without polling the manager.
mod bus;
mod types;

pub use bus::EventBus;
pub use types::{SkipReason, TurnEvent};
