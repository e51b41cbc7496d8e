use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use animation_sequencer::{
    Action, ActionError, AnimationScheduler, Block, HostClock, Predicate, SequenceError,
    TokioHost,
};
use async_trait::async_trait;
use tokio::time::Instant;

/// Wraps [`TokioHost`] and counts how often each suspension kind is used.
#[derive(Default)]
struct CountingHost {
    inner: TokioHost,
    frames: Cell<usize>,
    timers: Cell<usize>,
}

#[async_trait(?Send)]
impl HostClock for CountingHost {
    fn now(&self) -> Instant {
        self.inner.now()
    }

    async fn next_frame(&self) -> Instant {
        self.frames.set(self.frames.get() + 1);
        self.inner.next_frame().await
    }

    async fn sleep(&self, duration: Duration) {
        self.timers.set(self.timers.get() + 1);
        self.inner.sleep(duration).await
    }
}

fn counting_scheduler() -> (Rc<CountingHost>, AnimationScheduler) {
    let host = Rc::new(CountingHost::default());
    let scheduler = AnimationScheduler::new(host.clone());
    (host, scheduler)
}

#[tokio::test(start_paused = true)]
async fn short_delay_polls_repaint_clock_until_elapsed() {
    let (host, scheduler) = counting_scheduler();
    let start = Instant::now();

    scheduler.create_sequence().wait_ms(50).start().await.unwrap();

    assert!(Instant::now() - start >= Duration::from_millis(50));
    assert!(host.frames.get() >= 2);
    assert_eq!(host.timers.get(), 0);
}

#[tokio::test(start_paused = true)]
async fn long_delay_uses_exactly_one_timer() {
    let (host, scheduler) = counting_scheduler();
    let start = Instant::now();

    scheduler.create_sequence().wait_ms(600).start().await.unwrap();

    assert!(Instant::now() - start >= Duration::from_millis(600));
    assert_eq!(host.timers.get(), 1);
    assert_eq!(host.frames.get(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancelling_during_timer_releases_it_early() {
    let (_host, scheduler) = counting_scheduler();
    let reached = Rc::new(Cell::new(false));
    let flag = Rc::clone(&reached);

    let sequence = scheduler
        .create_sequence()
        .wait_ms(1_000)
        .then(Action::new(move || flag.set(true)));
    let id = sequence.id();
    let start = Instant::now();

    let canceller = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.cancel_sequence(id)
    };
    let (result, cancelled) = tokio::join!(sequence.start(), canceller);

    assert!(cancelled);
    assert_eq!(result, Err(SequenceError::Cancelled { id }));
    assert!(!reached.get());
    assert!(Instant::now() - start < Duration::from_millis(1_000));
}

#[tokio::test(start_paused = true)]
async fn cancelling_during_frame_wait_releases_it() {
    let (_host, scheduler) = counting_scheduler();
    let sequence = scheduler.create_sequence().wait_ms(40);
    let handle = sequence.handle();

    let canceller = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel()
    };
    let (result, _) = tokio::join!(sequence.start(), canceller);

    assert!(result.unwrap_err().is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn concurrent_step_waits_for_every_action() {
    let scheduler = AnimationScheduler::new(Rc::new(TokioHost::new()));
    let log = Rc::new(RefCell::new(Vec::new()));

    let settle_after = |millis: u64| {
        let log = Rc::clone(&log);
        Action::future(move || {
            let log = Rc::clone(&log);
            async move {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                log.borrow_mut().push(millis);
                Ok(())
            }
        })
    };
    let after = {
        let log = Rc::clone(&log);
        Action::new(move || log.borrow_mut().push(0))
    };

    scheduler
        .create_sequence()
        .concurrent(vec![settle_after(300), settle_after(100), settle_after(200)])
        .then(after)
        .start()
        .await
        .unwrap();

    assert_eq!(*log.borrow(), vec![100, 200, 300, 0]);
}

#[tokio::test(start_paused = true)]
async fn concurrent_failure_still_lets_siblings_settle() {
    let scheduler = AnimationScheduler::new(Rc::new(TokioHost::new()));
    let settled = Rc::new(Cell::new(false));
    let flag = Rc::clone(&settled);

    let slow = Action::future(move || {
        let flag = Rc::clone(&flag);
        async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            flag.set(true);
            Ok(())
        }
    });
    let failing = Action::fallible(|| Err(ActionError::new("blocked")));

    let result = scheduler
        .create_sequence()
        .concurrent(vec![failing, slow])
        .start()
        .await;

    match result {
        Err(SequenceError::ActionFailed { kind, .. }) => assert_eq!(kind, "concurrent"),
        other => panic!("expected concurrent failure, got {other:?}"),
    }
    assert!(settled.get());
}

#[tokio::test(start_paused = true)]
async fn loop_runs_body_once_per_truthy_evaluation() {
    let scheduler = AnimationScheduler::new(Rc::new(TokioHost::new()));
    let remaining = Rc::new(Cell::new(3));
    let runs = Rc::new(Cell::new(0));
    let log = Rc::new(RefCell::new(Vec::new()));

    let predicate = {
        let remaining = Rc::clone(&remaining);
        Predicate::new(move || {
            let left = remaining.get();
            if left == 0 {
                return false;
            }
            remaining.set(left - 1);
            true
        })
    };
    let body = {
        let runs = Rc::clone(&runs);
        let log = Rc::clone(&log);
        Block::new()
            .then(Action::new(move || {
                runs.set(runs.get() + 1);
                log.borrow_mut().push("body");
            }))
            .wait_ms(20)
    };
    let next = {
        let log = Rc::clone(&log);
        Action::new(move || log.borrow_mut().push("next"))
    };

    scheduler
        .create_sequence()
        .repeat_while(predicate, body)
        .then(next)
        .start()
        .await
        .unwrap();

    assert_eq!(runs.get(), 3);
    assert_eq!(*log.borrow(), vec!["body", "body", "body", "next"]);
}

#[tokio::test(start_paused = true)]
async fn cancelling_an_unbounded_loop_stops_it() {
    let scheduler = AnimationScheduler::new(Rc::new(TokioHost::new()));
    let iterations = Rc::new(Cell::new(0));
    let counter = Rc::clone(&iterations);

    let sequence = scheduler.create_sequence().repeat_while(
        Predicate::new(|| true),
        Block::new()
            .then(Action::new(move || counter.set(counter.get() + 1)))
            .wait_ms(100),
    );
    let id = sequence.id();

    let canceller = async {
        tokio::time::sleep(Duration::from_millis(450)).await;
        scheduler.cancel_sequence(id);
    };
    let (result, ()) = tokio::join!(sequence.start(), canceller);

    assert!(result.unwrap_err().is_cancelled());
    assert_eq!(iterations.get(), 5);
    assert_eq!(scheduler.live_count(), 0);
}
