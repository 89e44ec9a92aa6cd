//! Recovery from illegal or interrupted transitions.

use crate::core::{StateId, TransitionKind};
use crate::engine::machine::{Machine, MachineStatus};
use crate::engine::task::TaskSeed;
use crate::world::Body;
use tracing::{error, info};

/// One-shot task that puts an entity back into a known-good configuration.
///
/// Running it cancels whatever task is still installed, lands the machine
/// in `BAD_STATE`, restores the body from the machine's [`InitSnapshot`]
/// through [`Body::reset`], and enters `target`. If `target` has no
/// registered task the built-in idle task runs instead; recovery never
/// recurses into itself.
///
/// [`InitSnapshot`]: crate::core::InitSnapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recovery {
    target: StateId,
}

impl Recovery {
    pub fn new(target: StateId) -> Self {
        Self { target }
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    /// Execute the recovery and return the state the machine re-entered.
    pub fn run<B: Body + 'static>(self, machine: &mut Machine<B>, body: &mut B) -> StateId {
        machine.status = MachineStatus::Recovering;
        machine.pending = self.target;
        machine.cancel_task();

        let from = machine.current;
        machine.record(from, StateId::BAD_STATE, TransitionKind::Recovery);
        machine.current = StateId::BAD_STATE;

        body.reset(&machine.snapshot);

        if !machine.registry.contains(self.target) {
            error!(
                machine = %machine.name,
                target = %self.target,
                "recovery target has no task, using idle fallback"
            );
        }
        machine.enter(
            TaskSeed {
                previous: StateId::BAD_STATE,
                state: self.target,
                carry: None,
            },
            TransitionKind::Recovery,
        );
        machine.stats.recoveries += 1;
        machine.pending = StateId::NOT_A_STATE;
        machine.status = MachineStatus::Idle;

        info!(
            machine = %machine.name,
            from = machine.registry.label(from),
            to = machine.registry.label(self.target),
            "recovered"
        );
        self.target
    }
}
