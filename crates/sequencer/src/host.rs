//! Host timing primitives.
//!
//! A sequence suspends on exactly two kinds of host events: the next repaint
//! tick and a one-shot timer. Both are expressed as futures; dropping the
//! future releases the pending callback without firing it.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

/// Repaint clock and timer facility supplied by the host environment.
#[async_trait(?Send)]
pub trait HostClock {
    /// Current host time.
    fn now(&self) -> Instant;

    /// Suspends until the next repaint and returns its timestamp.
    async fn next_frame(&self) -> Instant;

    /// Suspends for `duration` using a single timer.
    async fn sleep(&self, duration: Duration);
}

/// [`HostClock`] backed by `tokio::time`.
///
/// Repaint ticks fall on a fixed grid of `frame_interval` measured from the
/// moment the host was created, so consecutive `next_frame` calls observe
/// the same cadence a display would. Honors tokio's paused test clock.
#[derive(Clone, Debug)]
pub struct TokioHost {
    origin: Instant,
    frame_interval: Duration,
}

impl TokioHost {
    /// Roughly 60 repaints per second.
    pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

    pub fn new() -> Self {
        Self::with_frame_interval(Self::DEFAULT_FRAME_INTERVAL)
    }

    pub fn with_frame_interval(frame_interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            frame_interval: frame_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// First repaint strictly after `now`.
    fn next_frame_deadline(&self, now: Instant) -> Instant {
        let interval = self.frame_interval.as_nanos();
        let elapsed = now.saturating_duration_since(self.origin).as_nanos();
        let frames = elapsed / interval + 1;
        self.origin + Duration::from_nanos((frames * interval) as u64)
    }
}

impl Default for TokioHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl HostClock for TokioHost {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn next_frame(&self) -> Instant {
        let deadline = self.next_frame_deadline(Instant::now());
        tokio::time::sleep_until(deadline).await;
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
