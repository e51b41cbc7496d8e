//! Cooperative animation sequencing for turn-based games.
//!
//! This library lets callers compose ordered, delayed, concurrent, conditional
//! and looped units of work and run them to completion or cancellation on a
//! single-threaded executor, paced by a host repaint clock.
//!
//! - **Single-threaded**: sequences are `!Send` futures driven by a local executor
//! - **Cooperative**: suspension happens only at delays and asynchronous actions
//! - **Cancellable**: cancellation releases the pending suspension immediately
//!
//! # Architecture
//!
//! - [`HostClock`]: repaint clock and timer supplied by the host ([`TokioHost`] by default)
//! - [`Step`]: one unit of work (delay, action, concurrent set, conditional, loop)
//! - [`Sequence`]: an append-only program of steps with a run/cancel state machine
//! - [`AnimationScheduler`]: registry of live sequences keyed by [`SequenceId`]

pub mod error;
pub mod host;
pub mod scheduler;
pub mod sequence;
pub mod step;

pub use error::{ActionError, SequenceError};
pub use host::{HostClock, TokioHost};
pub use scheduler::{AnimationScheduler, SequenceId};
pub use sequence::{SHORT_DELAY_THRESHOLD, Sequence, SequenceHandle, SequenceState, Suspension};
pub use step::{Action, ActionResult, Block, BlockStep, Predicate, Step};
