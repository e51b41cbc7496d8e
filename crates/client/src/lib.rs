//! Headless host for the dungeon turn loop.
//!
//! The binary plays the part of the game shell: it owns the board, provides
//! the repaint clock through [`animation_sequencer::TokioHost`], and feeds
//! scripted player actions into the [`runtime::TurnManager`].

pub mod config;
pub mod demo;
pub mod effects;
pub mod logging;

pub use config::{ClientConfig, HostConfig};
pub use demo::DemoBoard;
pub use effects::HitFlash;
