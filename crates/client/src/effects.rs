//! Cosmetic animations the host plays on top of the turn loop.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use animation_sequencer::{Action, AnimationScheduler, Block, Predicate, Sequence};
use tracing::trace;

/// Blinking overlay shown after the player is struck.
#[derive(Clone, Copy, Debug)]
pub struct HitFlash {
    pub blinks: u32,
    pub interval: Duration,
}

impl Default for HitFlash {
    fn default() -> Self {
        Self {
            blinks: 3,
            interval: Duration::from_millis(40),
        }
    }
}

impl HitFlash {
    /// Shake and sound fire together, then the overlay toggles `blinks` times.
    /// `toggles` counts overlay flips.
    pub fn sequence(&self, scheduler: &AnimationScheduler, toggles: Rc<Cell<u32>>) -> Sequence {
        let remaining = Rc::new(Cell::new(self.blinks));

        scheduler
            .create_sequence()
            .concurrent([
                Action::new(|| trace!("screen shake")),
                Action::new(|| trace!("hit sound")),
            ])
            .repeat_while(
                Predicate::new(move || match remaining.get() {
                    0 => false,
                    left => {
                        remaining.set(left - 1);
                        true
                    }
                }),
                Block::new()
                    .then(Action::new(move || toggles.set(toggles.get() + 1)))
                    .wait(self.interval),
            )
    }
}
