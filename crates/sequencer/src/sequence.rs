//! Animation sequences.
//!
//! A [`Sequence`] is built by chaining step appends and then consumed by
//! [`Sequence::start`]. Execution suspends only on delays and asynchronous
//! actions; cancellation is observed before every step and releases any
//! pending frame or timer wait immediately.

use std::cell::Cell;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::error::SequenceError;
use crate::host::HostClock;
use crate::scheduler::{Registry, SequenceId};
use crate::step::{Action, Block, BlockStep, Predicate, Step};

/// Delays at or below this length are paced by the repaint clock; longer
/// delays use a single timer.
pub const SHORT_DELAY_THRESHOLD: Duration = Duration::from_millis(50);

/// Lifecycle of a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl SequenceState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SequenceState::Completed | SequenceState::Cancelled | SequenceState::Failed
        )
    }
}

/// The host callback a running sequence is currently parked on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Suspension {
    #[default]
    None,
    Frame,
    Timer,
}

pub(crate) struct Shared {
    id: SequenceId,
    state: Cell<SequenceState>,
    suspension: Cell<Suspension>,
    cancel_tx: watch::Sender<bool>,
}

impl Shared {
    fn new(id: SequenceId) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            id,
            state: Cell::new(SequenceState::Idle),
            suspension: Cell::new(Suspension::None),
            cancel_tx,
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }

    fn request_cancel(&self) -> bool {
        if self.state.get().is_terminal() {
            return false;
        }
        let already = self.cancel_tx.send_replace(true);
        if !already {
            trace!(target: "sequencer", id = %self.id, "cancellation requested");
        }
        !already
    }
}

/// Cloneable view of a sequence used to observe or cancel it from elsewhere,
/// including from inside one of its own actions.
#[derive(Clone)]
pub struct SequenceHandle {
    shared: Rc<Shared>,
}

impl SequenceHandle {
    pub fn id(&self) -> SequenceId {
        self.shared.id
    }

    pub fn state(&self) -> SequenceState {
        self.shared.state.get()
    }

    pub fn suspension(&self) -> Suspension {
        self.shared.suspension.get()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.is_cancelled()
    }

    /// Requests cancellation. Returns `false` if the sequence already
    /// finished or was already cancelled.
    pub fn cancel(&self) -> bool {
        self.shared.request_cancel()
    }
}

impl std::fmt::Debug for SequenceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceHandle")
            .field("id", &self.shared.id)
            .field("state", &self.shared.state.get())
            .field("suspension", &self.shared.suspension.get())
            .finish()
    }
}

/// An ordered, cancellable program of steps.
///
/// Created idle by [`AnimationScheduler::create_sequence`](crate::AnimationScheduler::create_sequence),
/// extended through the chainable builder methods, and run once with
/// [`start`](Self::start). Dropping an unstarted sequence deregisters it.
pub struct Sequence {
    shared: Rc<Shared>,
    steps: Vec<Step>,
    host: Rc<dyn HostClock>,
    registry: Weak<RefCell<Registry>>,
    started: bool,
}

impl Sequence {
    pub(crate) fn new(
        id: SequenceId,
        host: Rc<dyn HostClock>,
        registry: Weak<RefCell<Registry>>,
    ) -> Self {
        Self {
            shared: Rc::new(Shared::new(id)),
            steps: Vec::new(),
            host,
            registry,
            started: false,
        }
    }

    pub fn id(&self) -> SequenceId {
        self.shared.id
    }

    pub fn handle(&self) -> SequenceHandle {
        SequenceHandle {
            shared: Rc::clone(&self.shared),
        }
    }

    pub fn state(&self) -> SequenceState {
        self.shared.state.get()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn wait(mut self, duration: Duration) -> Self {
        self.steps.push(Step::Delay(duration));
        self
    }

    pub fn wait_ms(self, millis: u64) -> Self {
        self.wait(Duration::from_millis(millis))
    }

    pub fn then(mut self, action: Action) -> Self {
        self.steps.push(Step::Action(action));
        self
    }

    pub fn concurrent(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.steps
            .push(Step::Concurrent(actions.into_iter().collect()));
        self
    }

    /// Runs `then_block` when `predicate` holds, otherwise nothing.
    pub fn conditional(mut self, predicate: Predicate, then_block: impl Into<Block>) -> Self {
        self.steps.push(Step::Conditional {
            predicate,
            then_steps: then_block.into().into_steps(),
            else_steps: None,
        });
        self
    }

    /// Runs exactly one of the two blocks depending on `predicate`.
    pub fn conditional_else(
        mut self,
        predicate: Predicate,
        then_block: impl Into<Block>,
        else_block: impl Into<Block>,
    ) -> Self {
        self.steps.push(Step::Conditional {
            predicate,
            then_steps: then_block.into().into_steps(),
            else_steps: Some(else_block.into().into_steps()),
        });
        self
    }

    /// Runs `body` for as long as `predicate` holds, re-evaluating it before
    /// every iteration. An always-true predicate never terminates.
    pub fn repeat_while(mut self, predicate: Predicate, body: impl Into<Block>) -> Self {
        self.steps.push(Step::Loop {
            predicate,
            body: body.into().into_steps(),
        });
        self
    }

    /// Requests cancellation; a later [`start`](Self::start) fails immediately.
    pub fn cancel(&self) -> bool {
        self.shared.request_cancel()
    }

    /// Runs every step in append order.
    ///
    /// Resolves `Ok(())` once all steps are exhausted, or fails with
    /// [`SequenceError::Cancelled`] / [`SequenceError::ActionFailed`]. Either
    /// way the sequence is deregistered from its scheduler.
    pub async fn start(mut self) -> Result<(), SequenceError> {
        self.started = true;
        let steps = std::mem::take(&mut self.steps);
        let mut run = Run {
            cancel_rx: self.shared.cancel_tx.subscribe(),
            shared: Rc::clone(&self.shared),
            host: Rc::clone(&self.host),
            registry: self.registry.clone(),
            finished: false,
        };
        drop(self);

        run.execute(&steps).await
    }
}

impl Drop for Sequence {
    fn drop(&mut self) {
        if self.started {
            return;
        }
        self.shared.cancel_tx.send_replace(true);
        self.shared.state.set(SequenceState::Cancelled);
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().complete(self.shared.id);
        }
        trace!(target: "sequencer", id = %self.shared.id, "dropped before start");
    }
}

impl std::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence")
            .field("id", &self.shared.id)
            .field("state", &self.shared.state.get())
            .field("steps", &self.steps.len())
            .finish()
    }
}

/// Execution state of a started sequence.
///
/// Dropping it before it finishes (the caller dropped the `start` future)
/// counts as cancellation.
struct Run {
    shared: Rc<Shared>,
    host: Rc<dyn HostClock>,
    registry: Weak<RefCell<Registry>>,
    cancel_rx: watch::Receiver<bool>,
    finished: bool,
}

impl Run {
    async fn execute(&mut self, steps: &[Step]) -> Result<(), SequenceError> {
        if self.shared.is_cancelled() {
            let error = self.cancelled();
            return self.finish(Err(error));
        }

        self.shared.state.set(SequenceState::Running);
        debug!(target: "sequencer", id = %self.shared.id, steps = steps.len(), "sequence started");

        let result = self.run_steps(steps).await;
        self.finish(result)
    }

    async fn run_steps(&mut self, steps: &[Step]) -> Result<(), SequenceError> {
        for (index, step) in steps.iter().enumerate() {
            self.ensure_active()?;
            trace!(target: "sequencer", id = %self.shared.id, index, kind = step.kind(), "step");

            match step {
                Step::Delay(duration) => self.delay(*duration).await?,
                Step::Action(action) => self.invoke(action, index, "action").await?,
                Step::Concurrent(actions) => self.concurrent(actions, index).await?,
                Step::Conditional {
                    predicate,
                    then_steps,
                    else_steps,
                } => {
                    if predicate.evaluate().await {
                        self.run_block(then_steps, index).await?;
                    } else if let Some(else_steps) = else_steps {
                        self.run_block(else_steps, index).await?;
                    }
                }
                Step::Loop { predicate, body } => loop {
                    self.ensure_active()?;
                    if !predicate.evaluate().await {
                        break;
                    }
                    self.run_block(body, index).await?;
                },
            }
        }

        // Cancelled while the last step was in flight.
        self.ensure_active()
    }

    async fn run_block(&mut self, steps: &[BlockStep], index: usize) -> Result<(), SequenceError> {
        for step in steps {
            self.ensure_active()?;
            match step {
                BlockStep::Delay(duration) => self.delay(*duration).await?,
                BlockStep::Action(action) => self.invoke(action, index, "action").await?,
            }
        }
        Ok(())
    }

    async fn invoke(
        &self,
        action: &Action,
        index: usize,
        kind: &'static str,
    ) -> Result<(), SequenceError> {
        action
            .invoke()
            .await
            .map_err(|source| SequenceError::ActionFailed {
                id: self.shared.id,
                index,
                kind,
                source,
            })
    }

    async fn concurrent(&self, actions: &[Action], index: usize) -> Result<(), SequenceError> {
        let results = join_all(actions.iter().map(Action::invoke)).await;

        match results.into_iter().find_map(Result::err) {
            Some(source) => Err(SequenceError::ActionFailed {
                id: self.shared.id,
                index,
                kind: "concurrent",
                source,
            }),
            None => Ok(()),
        }
    }

    async fn delay(&mut self, duration: Duration) -> Result<(), SequenceError> {
        if duration <= SHORT_DELAY_THRESHOLD {
            self.frame_delay(duration).await
        } else {
            self.timer_delay(duration).await
        }
    }

    /// Polls the repaint clock once per frame until `duration` has elapsed.
    async fn frame_delay(&mut self, duration: Duration) -> Result<(), SequenceError> {
        let start = self.host.now();

        loop {
            self.shared.suspension.set(Suspension::Frame);
            let frame = tokio::select! {
                biased;
                _ = cancelled(&mut self.cancel_rx) => None,
                timestamp = self.host.next_frame() => Some(timestamp),
            };
            self.shared.suspension.set(Suspension::None);

            let Some(timestamp) = frame else {
                return Err(self.cancelled());
            };
            if timestamp.saturating_duration_since(start) >= duration {
                return Ok(());
            }
        }
    }

    /// Parks on one timer for the full duration.
    async fn timer_delay(&mut self, duration: Duration) -> Result<(), SequenceError> {
        self.shared.suspension.set(Suspension::Timer);
        let fired = tokio::select! {
            biased;
            _ = cancelled(&mut self.cancel_rx) => false,
            _ = self.host.sleep(duration) => true,
        };
        self.shared.suspension.set(Suspension::None);

        if fired {
            Ok(())
        } else {
            Err(self.cancelled())
        }
    }

    fn ensure_active(&self) -> Result<(), SequenceError> {
        if self.shared.is_cancelled() {
            Err(self.cancelled())
        } else {
            Ok(())
        }
    }

    fn cancelled(&self) -> SequenceError {
        SequenceError::Cancelled {
            id: self.shared.id,
        }
    }

    fn finish(&mut self, result: Result<(), SequenceError>) -> Result<(), SequenceError> {
        let state = match &result {
            Ok(()) => SequenceState::Completed,
            Err(SequenceError::Cancelled { .. }) => SequenceState::Cancelled,
            Err(SequenceError::ActionFailed { .. }) => SequenceState::Failed,
        };
        self.shared.state.set(state);
        self.shared.suspension.set(Suspension::None);
        self.finished = true;
        self.deregister();

        match &result {
            Ok(()) => debug!(target: "sequencer", id = %self.shared.id, "sequence completed"),
            Err(error) => debug!(target: "sequencer", id = %self.shared.id, %error, "sequence ended early"),
        }
        result
    }

    fn deregister(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().complete(self.shared.id);
        }
    }
}

impl Drop for Run {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.shared.cancel_tx.send_replace(true);
        self.shared.state.set(SequenceState::Cancelled);
        self.shared.suspension.set(Suspension::None);
        self.deregister();
        debug!(target: "sequencer", id = %self.shared.id, "sequence dropped while running");
    }
}

/// Resolves once cancellation has been requested.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    // The sender lives in `Shared`, which outlives every receiver.
    let _ = rx.wait_for(|cancelled| *cancelled).await;
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{ActionError, AnimationScheduler, TokioHost};

    fn scheduler() -> AnimationScheduler {
        AnimationScheduler::new(Rc::new(TokioHost::new()))
    }

    fn log() -> Rc<RefCell<Vec<&'static str>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn push(log: &Rc<RefCell<Vec<&'static str>>>, entry: &'static str) -> Action {
        let log = Rc::clone(log);
        Action::new(move || log.borrow_mut().push(entry))
    }

    #[tokio::test(start_paused = true)]
    async fn steps_run_in_append_order() {
        let scheduler = scheduler();
        let log = log();

        let result = scheduler
            .create_sequence()
            .then(push(&log, "a"))
            .wait_ms(10)
            .then(push(&log, "b"))
            .wait_ms(200)
            .then(push(&log, "c"))
            .start()
            .await;

        assert!(result.is_ok());
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_inside_action_skips_following_steps() {
        let scheduler = scheduler();
        let log = log();
        let sequence = scheduler.create_sequence();
        let handle = sequence.handle();

        let canceller = handle.clone();
        let result = sequence
            .then(push(&log, "first"))
            .then(Action::new(move || {
                canceller.cancel();
            }))
            .then(push(&log, "never"))
            .start()
            .await;

        assert_eq!(result, Err(SequenceError::Cancelled { id: handle.id() }));
        assert_eq!(*log.borrow(), vec!["first"]);
        assert_eq!(handle.state(), SequenceState::Cancelled);
        assert!(!scheduler.is_live(handle.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_last_action_still_reports_cancelled() {
        let scheduler = scheduler();
        let sequence = scheduler.create_sequence();
        let handle = sequence.handle();

        let result = sequence
            .then(Action::new(move || {
                handle.cancel();
            }))
            .start()
            .await;

        assert!(result.unwrap_err().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_start_runs_nothing() {
        let scheduler = scheduler();
        let log = log();
        let sequence = scheduler.create_sequence().then(push(&log, "never"));
        assert!(sequence.cancel());

        let result = sequence.start().await;

        assert!(result.unwrap_err().is_cancelled());
        assert!(log.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_action_aborts_remaining_steps() {
        let scheduler = scheduler();
        let log = log();
        let sequence = scheduler.create_sequence();
        let handle = sequence.handle();

        let result = sequence
            .then(push(&log, "before"))
            .then(Action::fallible(|| Err(ActionError::new("boom"))))
            .then(push(&log, "after"))
            .start()
            .await;

        match result {
            Err(SequenceError::ActionFailed {
                index, kind, source, ..
            }) => {
                assert_eq!(index, 1);
                assert_eq!(kind, "action");
                assert_eq!(source.message(), "boom");
            }
            other => panic!("expected action failure, got {other:?}"),
        }
        assert_eq!(*log.borrow(), vec!["before"]);
        assert_eq!(handle.state(), SequenceState::Failed);
        assert!(!scheduler.is_live(handle.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn suspension_reflects_pending_wait_kind() {
        let scheduler = scheduler();
        let short = scheduler.create_sequence().wait_ms(40);
        let long = scheduler.create_sequence().wait_ms(500);
        let short_handle = short.handle();
        let long_handle = long.handle();

        let probe = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            (short_handle.suspension(), long_handle.suspension())
        };

        let (short_result, long_result, seen) = tokio::join!(short.start(), long.start(), probe);

        assert!(short_result.is_ok());
        assert!(long_result.is_ok());
        assert_eq!(seen, (Suspension::Frame, Suspension::Timer));
        assert_eq!(short_handle.suspension(), Suspension::None);
        assert_eq!(long_handle.suspension(), Suspension::None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_running_future_deregisters() {
        let scheduler = scheduler();
        let sequence = scheduler.create_sequence().wait_ms(1_000);
        let handle = sequence.handle();

        let outcome =
            tokio::time::timeout(Duration::from_millis(100), sequence.start()).await;

        assert!(outcome.is_err());
        assert_eq!(handle.state(), SequenceState::Cancelled);
        assert!(!scheduler.is_live(handle.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn conditional_picks_exactly_one_branch() {
        let scheduler = scheduler();
        let log = log();

        scheduler
            .create_sequence()
            .conditional_else(
                Predicate::new(|| false),
                vec![push(&log, "then")],
                Block::new().then(push(&log, "else")).wait_ms(5),
            )
            .conditional(Predicate::new(|| false), push(&log, "skipped"))
            .conditional(Predicate::new(|| true), push(&log, "taken"))
            .start()
            .await
            .unwrap();

        assert_eq!(*log.borrow(), vec!["else", "taken"]);
    }

    #[tokio::test(start_paused = true)]
    async fn asynchronous_predicate_is_awaited() {
        let scheduler = scheduler();
        let log = log();

        scheduler
            .create_sequence()
            .conditional(
                Predicate::future(|| async {
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    true
                }),
                push(&log, "then"),
            )
            .start()
            .await
            .unwrap();

        assert_eq!(*log.borrow(), vec!["then"]);
    }
}
