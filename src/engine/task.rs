//! Resumable per-state tasks.
//!
//! A state task is the behavior of a machine while it occupies one state.
//! The machine calls [`StateTask::step`] exactly once per tick; the task
//! answers with a [`Step`] telling the machine whether to keep it,
//! retire it, or move to another state. Cancellation is simply dropping
//! the task: there is no callback and no partial progress survives.

use crate::core::StateId;
use crate::world::World;
use std::sync::Arc;

/// Outcome of stepping a task once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Yield; resume at the same point next tick.
    Continue,

    /// The task is done. `next`, if present, is requested as a transition;
    /// otherwise the machine keeps its state and idles.
    Complete { next: Option<StateId> },

    /// Ask the controller to move to another state.
    Transition(StateId),
}

impl Step {
    pub fn done() -> Self {
        Step::Complete { next: None }
    }

    pub fn then(next: impl Into<StateId>) -> Self {
        Step::Complete {
            next: Some(next.into()),
        }
    }

    pub fn to(target: impl Into<StateId>) -> Self {
        Step::Transition(target.into())
    }

    /// The transition this step requests, if any.
    pub fn requested(&self) -> Option<StateId> {
        match *self {
            Step::Continue => None,
            Step::Complete { next } => next,
            Step::Transition(target) => Some(target),
        }
    }
}

/// What a task factory knows about the transition that started it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskSeed {
    /// State the machine left; `NOT_A_STATE` for the very first task.
    pub previous: StateId,

    /// State the task runs in.
    pub state: StateId,

    /// Ultimate target of a multi-hop route passing through `state`.
    /// The machine requests it when the task completes without a follow-up;
    /// tasks may also request it themselves.
    pub carry: Option<StateId>,
}

/// Everything a task may read or touch during one step.
pub struct TaskContext<'a, B> {
    pub body: &'a mut B,
    pub world: &'a dyn World,
    /// Seconds since the previous tick.
    pub delta: f32,
    /// State the machine currently occupies.
    pub state: StateId,
    /// State recovery would re-enter.
    pub home: StateId,
    pub tick: u64,
}

/// Behavior of a machine while it occupies one state.
pub trait StateTask<B> {
    fn step(&mut self, cx: &mut TaskContext<'_, B>) -> Step;
}

impl<B, F> StateTask<B> for F
where
    F: FnMut(&mut TaskContext<'_, B>) -> Step,
{
    fn step(&mut self, cx: &mut TaskContext<'_, B>) -> Step {
        self(cx)
    }
}

/// Creates a fresh task each time its state is entered.
pub type TaskFactory<B> = Arc<dyn Fn(TaskSeed) -> Box<dyn StateTask<B>> + Send + Sync>;

/// Wrap a closure returning a concrete task into a [`TaskFactory`].
pub fn factory<B, T, F>(make: F) -> TaskFactory<B>
where
    T: StateTask<B> + 'static,
    F: Fn(TaskSeed) -> T + Send + Sync + 'static,
{
    Arc::new(move |seed| Box::new(make(seed)) as Box<dyn StateTask<B>>)
}

/// Built-in task that does nothing, forever.
///
/// Used for `INIT_STATE` by default, after a task completes without a
/// follow-up, and wherever a state's factory is missing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Idle;

impl<B> StateTask<B> for Idle {
    fn step(&mut self, _cx: &mut TaskContext<'_, B>) -> Step {
        Step::Continue
    }
}

/// Default task for `BAD_STATE`: leave immediately for the recovery target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LeaveBadState;

impl<B> StateTask<B> for LeaveBadState {
    fn step(&mut self, cx: &mut TaskContext<'_, B>) -> Step {
        Step::then(cx.home)
    }
}
