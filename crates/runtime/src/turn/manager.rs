use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use animation_sequencer::{
    Action, ActionError, AnimationScheduler, Block, Predicate, SequenceError, SequenceId,
};
use game_core::{EntityId, FreezeState, FreezeStatus, Position};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::phase::TurnPhase;
use super::queue::{QueuedActor, TurnOutcome, TurnSummary, plan_queue};
use crate::api::{ActorMove, ResolveError, Result, TurnContext};
use crate::config::TurnConfig;
use crate::events::{EventBus, SkipReason, TurnEvent};

/// Drives enemy turns for a host-owned [`TurnContext`].
///
/// All state lives on the current thread. Turn futures are `!Send` and are
/// meant to run on a `LocalSet` or a current-thread runtime alongside the
/// host's other sequences.
pub struct TurnManager<C: TurnContext + 'static> {
    inner: Rc<Inner<C>>,
}

struct Inner<C> {
    context: Rc<RefCell<C>>,
    scheduler: AnimationScheduler,
    config: TurnConfig,
    events: EventBus,
    phase: Cell<TurnPhase>,
    turn: Cell<u64>,
    freeze: Cell<FreezeState>,
    status: Cell<FreezeStatus>,
    queue: RefCell<VecDeque<QueuedActor>>,
    tracking: RefCell<TurnTracking>,
    active: Cell<Option<SequenceId>>,
    aborted: Cell<bool>,
}

/// Per-turn tile bookkeeping, reset at the start of every enemy turn.
#[derive(Debug, Default)]
struct TurnTracking {
    occupied: HashSet<Position>,
    initial_enemy_tiles: HashSet<Position>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActorOutcome {
    Pending,
    Resolved,
    Skipped(SkipReason),
}

impl<C: TurnContext + 'static> TurnManager<C> {
    pub fn new(
        context: Rc<RefCell<C>>,
        scheduler: AnimationScheduler,
        config: TurnConfig,
    ) -> Result<Self> {
        config.validate()?;
        let events = EventBus::with_capacity(config.event_buffer_size);

        Ok(Self {
            inner: Rc::new(Inner {
                context,
                scheduler,
                config,
                events,
                phase: Cell::new(TurnPhase::PlayerTurn),
                turn: Cell::new(0),
                freeze: Cell::new(FreezeState::new()),
                status: Cell::new(FreezeStatus::default()),
                queue: RefCell::new(VecDeque::new()),
                tracking: RefCell::new(TurnTracking::default()),
                active: Cell::new(None),
                aborted: Cell::new(false),
            }),
        })
    }

    pub fn phase(&self) -> TurnPhase {
        self.inner.phase.get()
    }

    pub fn accepts_input(&self) -> bool {
        self.phase().accepts_input()
    }

    /// Number of player actions handled so far.
    pub fn turn(&self) -> u64 {
        self.inner.turn.get()
    }

    /// Freeze decision of the most recent enemy turn.
    pub fn freeze_status(&self) -> FreezeStatus {
        self.inner.status.get()
    }

    /// Actors still waiting to act in the current turn.
    pub fn queue(&self) -> Vec<QueuedActor> {
        self.inner.queue.borrow().iter().copied().collect()
    }

    pub fn occupied_tiles(&self) -> HashSet<Position> {
        self.inner.tracking.borrow().occupied.clone()
    }

    pub fn initial_enemy_tiles(&self) -> HashSet<Position> {
        self.inner.tracking.borrow().initial_enemy_tiles.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TurnEvent> {
        self.inner.events.subscribe()
    }

    pub fn context(&self) -> &Rc<RefCell<C>> {
        &self.inner.context
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.inner.scheduler
    }

    pub fn config(&self) -> &TurnConfig {
        &self.inner.config
    }

    /// Host entry point, called once per resolved player action.
    ///
    /// A call made while an enemy turn is still in progress is discarded
    /// without advancing the turn counter.
    pub async fn handle_turn_completion(&self) -> TurnOutcome {
        if !self.accepts_input() {
            debug!(
                target: "runtime::turn",
                phase = ?self.phase(),
                "turn completion ignored, enemy turn in progress"
            );
            return TurnOutcome::Ignored;
        }

        self.start_enemy_turns().await
    }

    /// Runs one full enemy turn and returns once input is open again.
    ///
    /// Every accepted call advances the turn counter.
    pub async fn start_enemy_turns(&self) -> TurnOutcome {
        let inner = &self.inner;
        if inner.phase.get() != TurnPhase::PlayerTurn {
            debug!(target: "runtime::turn", "enemy turn already running");
            return TurnOutcome::Ignored;
        }

        let turn = inner.turn.get() + 1;
        inner.turn.set(turn);
        inner.context.borrow_mut().cancel_pending_input();
        inner.set_phase(TurnPhase::EnemyTurn);
        let _restore = RestoreOnDrop { inner, turn };
        inner.aborted.set(false);

        let status = inner.begin_turn(turn);
        inner.build_queue(turn);

        inner.set_phase(TurnPhase::Draining);
        let mut summary = TurnSummary::new(turn);
        while let Some(queued) = inner.pop_next() {
            inner.run_actor(turn, queued, status.frozen, &mut summary).await;
        }

        if !inner.aborted.get() {
            let report = inner.context.borrow_mut().resolve_end_of_turn();
            summary.player_struck = report.player_struck;
            if report.pickups > 0 {
                debug!(target: "runtime::turn", turn, pickups = report.pickups, "pickups resolved");
            }
        }

        inner.final_pacing(turn, summary.player_struck).await;
        summary.aborted = inner.aborted.get();
        inner.restore_player_turn(turn, summary.player_struck);

        info!(
            target: "runtime::turn",
            turn,
            moved = summary.moved,
            skipped = summary.skipped,
            failed = summary.failed,
            player_struck = summary.player_struck,
            aborted = summary.aborted,
            "enemy turn complete"
        );
        TurnOutcome::Completed(summary)
    }

    /// Cuts the running turn short, e.g. on a level transition.
    ///
    /// Remaining queued actors are dropped and the in-flight actor sequence
    /// is cancelled. The final pacing delay is never cut, so input stays
    /// closed until it ends. Returns `false` when no enemy turn is running.
    pub fn abort_turn(&self) -> bool {
        let inner = &self.inner;
        if inner.phase.get().accepts_input() {
            return false;
        }

        inner.aborted.set(true);
        let dropped = {
            let mut queue = inner.queue.borrow_mut();
            let dropped = queue.len();
            queue.clear();
            dropped
        };
        if let Some(id) = inner.active.get() {
            inner.scheduler.cancel_sequence(id);
        }

        info!(target: "runtime::turn", turn = inner.turn.get(), dropped, "enemy turn aborted");
        true
    }

    /// Level transition: aborts any running turn and forgets the freeze
    /// history, so the next turn starts without a grace turn pending.
    pub fn enter_zone(&self) {
        let inner = &self.inner;
        let aborted = self.abort_turn();

        let mut freeze = inner.freeze.get();
        freeze.reset();
        inner.freeze.set(freeze);
        inner.status.set(FreezeStatus::default());

        info!(target: "runtime::turn", turn = inner.turn.get(), aborted, "entered new zone");
    }
}

impl<C: TurnContext + 'static> Inner<C> {
    fn set_phase(&self, phase: TurnPhase) {
        self.phase.set(phase);
        if let Ok(mut context) = self.context.try_borrow_mut() {
            context.on_phase_changed(phase);
        }
    }

    /// Resets per-turn tracking and advances the freeze state.
    fn begin_turn(&self, turn: u64) -> FreezeStatus {
        let context = self.context.borrow();
        let player = context.player_position();

        {
            let mut tracking = self.tracking.borrow_mut();
            tracking.occupied.clear();
            tracking.occupied.insert(player);
            tracking.initial_enemy_tiles =
                context.actors().iter().map(|actor| actor.position).collect();
        }

        let mut freeze = self.freeze.get();
        let status = freeze.advance(context.grid().is_exit(player));
        self.freeze.set(freeze);
        self.status.set(status);

        debug!(
            target: "runtime::turn",
            turn,
            %player,
            frozen = status.frozen,
            grace = status.grace,
            "enemy turn started"
        );
        self.events.publish(TurnEvent::EnemyTurnStarted {
            turn,
            frozen: status.frozen,
            show_frozen: status.show_frozen,
            grace: status.grace,
        });
        status
    }

    fn build_queue(&self, turn: u64) {
        let planned = {
            let context = self.context.borrow();
            plan_queue(&*context, &self.config.game, turn)
        };
        let actors = planned.clone().unwrap_or_default();

        {
            let mut queue = self.queue.borrow_mut();
            queue.clear();
            queue.extend(actors.iter().copied());
        }

        debug!(target: "runtime::turn", turn, len = actors.len(), "turn queue built");
        self.events.publish(TurnEvent::QueueBuilt {
            turn,
            mode: self.config.movement_mode(),
            queue: actors,
        });

        if planned.is_none() {
            info!(target: "runtime::turn", turn, "stalemate, no actor can move");
            self.events.publish(TurnEvent::Stalemate { turn });
        }
    }

    fn pop_next(&self) -> Option<QueuedActor> {
        self.queue.borrow_mut().pop_front()
    }

    /// Runs one actor's sequence to its end and records the result.
    async fn run_actor(
        self: &Rc<Self>,
        turn: u64,
        queued: QueuedActor,
        frozen: bool,
        summary: &mut TurnSummary,
    ) {
        let outcome = Rc::new(Cell::new(ActorOutcome::Pending));
        let sequence = self.scheduler.create_sequence().conditional_else(
            self.may_act(queued.id, frozen, Rc::clone(&outcome)),
            Block::new()
                .then(self.resolve_action(queued, Rc::clone(&outcome)))
                .wait(self.config.move_pacing),
            Block::new().wait(self.config.frozen_pacing),
        );

        self.active.set(Some(sequence.id()));
        let result = sequence.start().await;
        self.active.set(None);

        let actor = queued.id;
        match result {
            Err(error @ SequenceError::ActionFailed { .. }) => {
                warn!(target: "runtime::turn", turn, %actor, %error, "actor move failed");
                summary.failed += 1;
                self.events.publish(TurnEvent::ActorFailed {
                    turn,
                    actor,
                    error: error.to_string(),
                });
                return;
            }
            Err(error) => {
                debug!(target: "runtime::turn", turn, %actor, %error, "actor sequence cancelled");
            }
            Ok(()) => {}
        }

        match outcome.get() {
            ActorOutcome::Resolved => {
                summary.moved += 1;
                self.events.publish(TurnEvent::ActorResolved { turn, actor });
            }
            ActorOutcome::Skipped(reason) => self.skip(turn, actor, reason, summary),
            ActorOutcome::Pending => self.skip(turn, actor, SkipReason::Cancelled, summary),
        }
    }

    fn skip(&self, turn: u64, actor: EntityId, reason: SkipReason, summary: &mut TurnSummary) {
        debug!(target: "runtime::turn", turn, %actor, ?reason, "actor skipped");
        summary.skipped += 1;
        self.events.publish(TurnEvent::ActorSkipped {
            turn,
            actor,
            reason,
        });
    }

    /// Evaluated when the actor's sequence reaches it, after every earlier
    /// actor has resolved.
    fn may_act(&self, id: EntityId, frozen: bool, outcome: Rc<Cell<ActorOutcome>>) -> Predicate {
        let context = Rc::clone(&self.context);
        Predicate::new(move || {
            if frozen {
                outcome.set(ActorOutcome::Skipped(SkipReason::Frozen));
                return false;
            }
            if !context.borrow().contains(id) {
                outcome.set(ActorOutcome::Skipped(SkipReason::Removed));
                return false;
            }
            true
        })
    }

    fn resolve_action(self: &Rc<Self>, queued: QueuedActor, outcome: Rc<Cell<ActorOutcome>>) -> Action {
        let inner = Rc::clone(self);
        Action::fallible(move || {
            inner.resolve(queued).map_err(ActionError::from_error)?;
            outcome.set(ActorOutcome::Resolved);
            Ok(())
        })
    }

    fn resolve(&self, queued: QueuedActor) -> std::result::Result<(), ResolveError> {
        let mut context = self.context.borrow_mut();
        let actor = context
            .actor(queued.id)
            .ok_or(ResolveError::UnknownActor(queued.id))?;

        let mut tracking = self.tracking.borrow_mut();
        let TurnTracking {
            occupied,
            initial_enemy_tiles,
        } = &mut *tracking;

        context.resolve_actor(ActorMove {
            actor,
            destination: queued.destination,
            occupied,
            initial_enemy_tiles,
        })
    }

    /// Input stays closed for the whole delay. The sequence is not tracked
    /// in `active`, so an abort cannot cut it short.
    async fn final_pacing(&self, turn: u64, player_struck: bool) {
        let pacing = self.config.final_pacing_for(player_struck);
        let sequence = self.scheduler.create_sequence().wait(pacing);

        if let Err(error) = sequence.start().await {
            debug!(target: "runtime::turn", turn, %error, "final pacing cut short");
        }
    }

    fn restore_player_turn(&self, turn: u64, player_struck: bool) {
        self.set_phase(TurnPhase::PlayerTurn);
        self.events.publish(TurnEvent::PlayerTurnRestored {
            turn,
            player_struck,
        });
    }
}

/// Hands the board back to the player if a turn future is dropped mid-turn.
struct RestoreOnDrop<'a, C: TurnContext + 'static> {
    inner: &'a Inner<C>,
    turn: u64,
}

impl<C: TurnContext + 'static> Drop for RestoreOnDrop<'_, C> {
    fn drop(&mut self) {
        if self.inner.phase.get().accepts_input() {
            return;
        }

        warn!(target: "runtime::turn", turn = self.turn, "enemy turn dropped before completion");
        if let Ok(mut queue) = self.inner.queue.try_borrow_mut() {
            queue.clear();
        }
        self.inner.active.set(None);
        self.inner.restore_player_turn(self.turn, false);
    }
}
