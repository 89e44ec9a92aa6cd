//! Machine instance: one per entity.

use crate::builder::{HopTable, StateRegistry, TransitionGraph};
use crate::core::{InitSnapshot, StateHistory, StateId, StateTransition, TransitionKind};
use crate::engine::task::{Idle, StateTask, Step, TaskContext, TaskSeed};
use crate::world::{Body, World};
use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;

/// What the controller is doing with a machine.
///
/// Outside of a `request_transition` call the status is always `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MachineStatus {
    Idle,
    Transitioning,
    Recovering,
}

/// Counters kept by a machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MachineStats {
    pub ticks: u64,
    pub cancellations: u64,
    pub hops: u64,
    pub recoveries: u64,
}

/// Per-entity state machine.
///
/// Holds the current state, the pending target (sentinel when idle), the
/// snapshot recovery restores, and at most one running task. Built with
/// [`MachineBuilder`](crate::builder::MachineBuilder); mutated only by
/// [`Machine::request_transition`] and [`Machine::tick`].
pub struct Machine<B> {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) registry: StateRegistry<B>,
    pub(crate) graph: TransitionGraph,
    pub(crate) hops: HopTable,
    pub(crate) start: StateId,
    pub(crate) recovery_target: StateId,
    pub(crate) current: StateId,
    pub(crate) pending: StateId,
    /// Ultimate target of the hop being travelled, requested when the
    /// intermediate task completes without naming a follow-up.
    pub(crate) carry: Option<StateId>,
    pub(crate) status: MachineStatus,
    pub(crate) snapshot: InitSnapshot,
    pub(crate) task: Option<Box<dyn StateTask<B>>>,
    pub(crate) history: StateHistory,
    pub(crate) stats: MachineStats,
}

impl<B: Body + 'static> Machine<B> {
    /// Assemble a machine and start the task for `start`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn launch(
        name: String,
        registry: StateRegistry<B>,
        graph: TransitionGraph,
        hops: HopTable,
        start: StateId,
        recovery_target: StateId,
        history: StateHistory,
        body: &B,
    ) -> Self {
        let mut machine = Self {
            id: Uuid::new_v4(),
            name,
            registry,
            graph,
            hops,
            start,
            recovery_target,
            current: start,
            pending: StateId::NOT_A_STATE,
            carry: None,
            status: MachineStatus::Idle,
            snapshot: InitSnapshot::capture(body.transform(), start),
            task: None,
            history,
            stats: MachineStats::default(),
        };
        machine.task = Some(machine.spawn(TaskSeed {
            previous: StateId::NOT_A_STATE,
            state: start,
            carry: None,
        }));
        debug!(
            machine = %machine.name,
            id = %machine.id,
            start = machine.registry.label(start),
            "machine started"
        );
        machine
    }

    /// Advance the active task by one step and apply whatever it asks for.
    pub fn tick(&mut self, body: &mut B, world: &dyn World, delta: f32) -> Step {
        self.stats.ticks += 1;
        let state = self.current;
        let home = self.recovery_target;
        let tick = self.stats.ticks;

        let task = self.task.get_or_insert_with(|| Box::new(Idle));
        let mut cx = TaskContext {
            body: &mut *body,
            world,
            delta,
            state,
            home,
            tick,
        };
        let step = task.step(&mut cx);

        match step {
            Step::Continue => {}
            Step::Complete { next: None } => match self.carry {
                Some(target) => {
                    debug!(
                        machine = %self.name,
                        state = self.registry.label(state),
                        toward = self.registry.label(target),
                        "intermediate task complete, resuming route"
                    );
                    self.request_transition(body, target);
                }
                None => {
                    debug!(
                        machine = %self.name,
                        state = self.registry.label(state),
                        "task complete, idling"
                    );
                    self.task = Some(Box::new(Idle));
                }
            },
            Step::Complete { next: Some(target) } | Step::Transition(target) => {
                self.request_transition(body, target);
            }
        }
        step
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// State the machine currently occupies.
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// Target of the transition being applied; `NOT_A_STATE` when idle.
    pub fn pending_state(&self) -> StateId {
        self.pending
    }

    pub fn start_state(&self) -> StateId {
        self.start
    }

    pub fn recovery_target(&self) -> StateId {
        self.recovery_target
    }

    pub fn status(&self) -> MachineStatus {
        self.status
    }

    pub fn snapshot(&self) -> &InitSnapshot {
        &self.snapshot
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn stats(&self) -> MachineStats {
        self.stats
    }

    /// Ultimate target of the route currently being travelled, if any.
    pub fn carried_target(&self) -> Option<StateId> {
        self.carry
    }

    /// Whether a task is currently installed.
    pub fn has_active_task(&self) -> bool {
        self.task.is_some()
    }

    pub fn registry(&self) -> &StateRegistry<B> {
        &self.registry
    }

    pub fn graph(&self) -> &TransitionGraph {
        &self.graph
    }

    pub fn hops(&self) -> &HopTable {
        &self.hops
    }

    /// Check whether `target` is a declared successor of the current state.
    pub fn can_transition_to(&self, target: impl Into<StateId>) -> bool {
        self.graph.is_legal(self.current, target.into())
    }

    /// Drop the running task, if any. Returns whether one was running.
    pub(crate) fn cancel_task(&mut self) -> bool {
        match self.task.take() {
            Some(_) => {
                self.stats.cancellations += 1;
                true
            }
            None => false,
        }
    }

    /// Make `seed.state` current and start its task.
    ///
    /// The seed's carry replaces whatever route was being travelled.
    pub(crate) fn enter(&mut self, seed: TaskSeed, kind: TransitionKind) {
        self.record(seed.previous, seed.state, kind);
        self.current = seed.state;
        self.carry = seed.carry;
        self.task = Some(self.spawn(seed));
    }

    pub(crate) fn record(&mut self, from: StateId, to: StateId, kind: TransitionKind) {
        self.history.record(StateTransition {
            from,
            to,
            kind,
            tick: self.stats.ticks,
            timestamp: Utc::now(),
        });
    }

    fn spawn(&self, seed: TaskSeed) -> Box<dyn StateTask<B>> {
        match self.registry.factory(seed.state) {
            Some(make) => make(seed),
            None => {
                error!(
                    machine = %self.name,
                    state = %seed.state,
                    "no task registered, falling back to idle"
                );
                Box::new(Idle)
            }
        }
    }
}

impl<B> std::fmt::Debug for Machine<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("current", &self.current)
            .field("pending", &self.pending)
            .field("carry", &self.carry)
            .field("status", &self.status)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
