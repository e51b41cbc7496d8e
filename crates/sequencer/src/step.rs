//! Sequence step model.
//!
//! A [`Step`] is one unit of work inside a [`Sequence`](crate::Sequence).
//! Conditional and loop bodies are [`Block`]s, which only hold the flat
//! [`BlockStep`] kinds (delays and single actions).

use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::error::ActionError;

pub type ActionResult = Result<(), ActionError>;

type ActionFn = dyn Fn() -> LocalBoxFuture<'static, ActionResult>;
type PredicateFn = dyn Fn() -> LocalBoxFuture<'static, bool>;

/// A side-effecting unit of work. Callable any number of times (loop bodies
/// re-run their actions once per iteration).
#[derive(Clone)]
pub struct Action {
    run: Rc<ActionFn>,
}

impl Action {
    /// Synchronous action that cannot fail.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::fallible(move || {
            f();
            Ok(())
        })
    }

    /// Synchronous action that may fail.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn() -> ActionResult + 'static,
    {
        Self {
            run: Rc::new(move || future::ready(f()).boxed_local()),
        }
    }

    /// Asynchronous action; the sequence suspends until the future settles.
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = ActionResult> + 'static,
    {
        Self {
            run: Rc::new(move || f().boxed_local()),
        }
    }

    pub(crate) fn invoke(&self) -> LocalBoxFuture<'static, ActionResult> {
        (self.run)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Boolean test evaluated once per visit of a conditional, and before every
/// iteration of a loop.
#[derive(Clone)]
pub struct Predicate {
    eval: Rc<PredicateFn>,
}

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Self {
            eval: Rc::new(move || future::ready(f()).boxed_local()),
        }
    }

    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = bool> + 'static,
    {
        Self {
            eval: Rc::new(move || f().boxed_local()),
        }
    }

    pub(crate) fn evaluate(&self) -> LocalBoxFuture<'static, bool> {
        (self.eval)()
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// One top-level unit of work in a sequence.
#[derive(Debug)]
pub enum Step {
    Delay(Duration),
    Action(Action),
    /// All actions start together; the step settles once every one has.
    Concurrent(Vec<Action>),
    Conditional {
        predicate: Predicate,
        then_steps: Vec<BlockStep>,
        else_steps: Option<Vec<BlockStep>>,
    },
    Loop {
        predicate: Predicate,
        body: Vec<BlockStep>,
    },
}

impl Step {
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Delay(_) => "delay",
            Step::Action(_) => "action",
            Step::Concurrent(_) => "concurrent",
            Step::Conditional { .. } => "conditional",
            Step::Loop { .. } => "loop",
        }
    }
}

/// Step kinds allowed inside conditional and loop bodies.
#[derive(Clone, Debug)]
pub enum BlockStep {
    Delay(Duration),
    Action(Action),
}

impl BlockStep {
    pub fn kind(&self) -> &'static str {
        match self {
            BlockStep::Delay(_) => "delay",
            BlockStep::Action(_) => "action",
        }
    }
}

/// Nested block content for conditionals and loops.
///
/// Built like a small sequence (`Block::new().then(a).wait_ms(100)`) or
/// converted from a flat list of actions.
#[derive(Clone, Debug, Default)]
pub struct Block {
    steps: Vec<BlockStep>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait(mut self, duration: Duration) -> Self {
        self.steps.push(BlockStep::Delay(duration));
        self
    }

    pub fn wait_ms(self, millis: u64) -> Self {
        self.wait(Duration::from_millis(millis))
    }

    pub fn then(mut self, action: Action) -> Self {
        self.steps.push(BlockStep::Action(action));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[BlockStep] {
        &self.steps
    }

    pub(crate) fn into_steps(self) -> Vec<BlockStep> {
        self.steps
    }
}

impl From<Vec<Action>> for Block {
    fn from(actions: Vec<Action>) -> Self {
        Self {
            steps: actions.into_iter().map(BlockStep::Action).collect(),
        }
    }
}

impl From<Action> for Block {
    fn from(action: Action) -> Self {
        Self::new().then(action)
    }
}
