//! Broadcast channel for turn events.

use tokio::sync::broadcast;

use super::types::TurnEvent;

/// Fan-out of [`TurnEvent`]s to any number of subscribers.
///
/// Publishing never blocks; slow subscribers observe `Lagged` and skip ahead.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<TurnEvent>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// `capacity` must be non-zero.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: TurnEvent) {
        if self.tx.send(event).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!(target: "runtime::turn", "no turn event subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TurnEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
