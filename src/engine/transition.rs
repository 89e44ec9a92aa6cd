//! Transition controller.
//!
//! Applies transition requests synchronously: the running task is always
//! cancelled first, then the request is either taken directly, routed
//! through an intermediate state, or handed to recovery. Illegal requests
//! are never surfaced as errors.

use crate::core::{StateId, TransitionKind};
use crate::engine::machine::{Machine, MachineStatus};
use crate::engine::recovery::Recovery;
use crate::engine::task::TaskSeed;
use crate::world::Body;
use tracing::{debug, warn};

/// How a transition request was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The edge was declared; the machine is now in `to`.
    Direct { from: StateId, to: StateId },

    /// No direct edge, but a hop was declared; the machine is now in
    /// `via` and will request `toward` when that task completes.
    Hopped {
        from: StateId,
        via: StateId,
        toward: StateId,
    },

    /// Illegal request; the entity was reset and the machine re-entered
    /// `target`.
    Recovered {
        from: StateId,
        requested: StateId,
        target: StateId,
    },

    /// The request named no state and was dropped.
    Ignored,
}

impl TransitionOutcome {
    /// State the machine occupies after the request.
    pub fn landed(&self) -> Option<StateId> {
        match *self {
            TransitionOutcome::Direct { to, .. } => Some(to),
            TransitionOutcome::Hopped { via, .. } => Some(via),
            TransitionOutcome::Recovered { target, .. } => Some(target),
            TransitionOutcome::Ignored => None,
        }
    }

    pub fn is_recovery(&self) -> bool {
        matches!(self, TransitionOutcome::Recovered { .. })
    }
}

impl<B: Body + 'static> Machine<B> {
    /// Request a move to `target`.
    ///
    /// 1. Record `target` as pending and cancel the running task.
    /// 2. If `current -> target` is declared, enter `target`.
    /// 3. Else, if a hop `(current, target) -> via` is declared and
    ///    `current -> via` is legal, enter `via` carrying `target`.
    /// 4. Else, recover to the recovery target.
    ///
    /// On return the machine is idle with exactly one task installed.
    pub fn request_transition(
        &mut self,
        body: &mut B,
        target: impl Into<StateId>,
    ) -> TransitionOutcome {
        let target = target.into();
        if target == StateId::NOT_A_STATE {
            return TransitionOutcome::Ignored;
        }

        let from = self.current;
        self.pending = target;
        self.status = MachineStatus::Transitioning;
        self.cancel_task();

        let outcome = if self.graph.is_legal(from, target) {
            self.enter(
                TaskSeed {
                    previous: from,
                    state: target,
                    carry: None,
                },
                TransitionKind::Direct,
            );
            debug!(
                machine = %self.name,
                from = self.registry.label(from),
                to = self.registry.label(target),
                "transition"
            );
            TransitionOutcome::Direct { from, to: target }
        } else if let Some(via) = self.legal_hop(from, target) {
            self.enter(
                TaskSeed {
                    previous: from,
                    state: via,
                    carry: Some(target),
                },
                TransitionKind::Hop,
            );
            self.stats.hops += 1;
            debug!(
                machine = %self.name,
                from = self.registry.label(from),
                via = self.registry.label(via),
                toward = self.registry.label(target),
                "transition routed through intermediate state"
            );
            TransitionOutcome::Hopped {
                from,
                via,
                toward: target,
            }
        } else {
            warn!(
                machine = %self.name,
                from = self.registry.label(from),
                to = %target,
                "illegal transition, recovering"
            );
            let landed = Recovery::new(self.recovery_target).run(self, body);
            TransitionOutcome::Recovered {
                from,
                requested: target,
                target: landed,
            }
        };

        self.pending = StateId::NOT_A_STATE;
        self.status = MachineStatus::Idle;
        outcome
    }

    /// Reset the entity and re-enter the recovery target unconditionally.
    pub fn recover(&mut self, body: &mut B) -> StateId {
        Recovery::new(self.recovery_target).run(self, body)
    }

    fn legal_hop(&self, from: StateId, target: StateId) -> Option<StateId> {
        self.hops
            .route(from, target)
            .filter(|via| self.graph.is_legal(from, *via))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MachineBuilder;
    use crate::core::{Transform, Vec3};
    use crate::engine::task::{Idle, Step, StateTask, TaskContext};
    use crate::world::Targets;

    const A: StateId = StateId::new(1);
    const B: StateId = StateId::new(2);
    const C: StateId = StateId::new(3);

    #[derive(Default)]
    struct Crate {
        transform: Transform,
    }

    impl Body for Crate {
        fn transform(&self) -> Transform {
            self.transform
        }

        fn set_transform(&mut self, transform: Transform) {
            self.transform = transform;
        }
    }

    /// Completes toward its carried target after one tick.
    struct Relay(Option<StateId>);

    impl StateTask<Crate> for Relay {
        fn step(&mut self, _cx: &mut TaskContext<'_, Crate>) -> Step {
            Step::Complete { next: self.0 }
        }
    }

    fn abc_machine(body: &Crate) -> Machine<Crate> {
        MachineBuilder::new()
            .name("abc")
            .register_state(A, |_| Idle)
            .register_state(B, |seed: TaskSeed| Relay(seed.carry))
            .register_state(C, |_| Idle)
            .declare_edge(A, [B])
            .declare_edge(B, [C])
            .declare_hop(A, C, B)
            .start(A)
            .build(body)
            .unwrap()
    }

    #[test]
    fn declared_edge_is_direct() {
        let mut body = Crate::default();
        let mut machine = abc_machine(&body);

        let outcome = machine.request_transition(&mut body, B);

        assert_eq!(outcome, TransitionOutcome::Direct { from: A, to: B });
        assert_eq!(machine.current_state(), B);
        assert_eq!(machine.pending_state(), StateId::NOT_A_STATE);
        assert_eq!(machine.status(), MachineStatus::Idle);
        assert_eq!(machine.stats().recoveries, 0);
    }

    #[test]
    fn hop_carries_ultimate_target() {
        let mut body = Crate::default();
        let world = Targets::default();
        let mut machine = abc_machine(&body);

        let outcome = machine.request_transition(&mut body, C);
        assert_eq!(
            outcome,
            TransitionOutcome::Hopped {
                from: A,
                via: B,
                toward: C
            }
        );
        assert_eq!(machine.current_state(), B);

        machine.tick(&mut body, &world, 0.1);
        assert_eq!(machine.current_state(), C);
        assert_eq!(machine.history().get_path(), vec![A, B, C]);
    }

    #[test]
    fn hop_resumes_when_intermediate_task_finishes_plainly() {
        let mut body = Crate::default();
        let world = Targets::default();
        let mut machine = MachineBuilder::new()
            .register_state(A, |_| Idle)
            .register_state(B, |_| |_cx: &mut TaskContext<'_, Crate>| Step::done())
            .register_state(C, |_| Idle)
            .declare_edge(A, [B])
            .declare_edge(B, [C])
            .declare_hop(A, C, B)
            .start(A)
            .build(&body)
            .unwrap();

        machine.request_transition(&mut body, C);
        assert_eq!(machine.carried_target(), Some(C));

        for _ in 0..3 {
            machine.tick(&mut body, &world, 0.1);
        }

        assert_eq!(machine.current_state(), C);
        assert_eq!(machine.carried_target(), None);
        assert_eq!(machine.history().get_path(), vec![A, B, C]);
    }

    #[test]
    fn direct_request_drops_carried_target() {
        let mut body = Crate::default();
        let mut machine = MachineBuilder::new()
            .register_state(A, |_| Idle)
            .register_state(B, |_| Idle)
            .register_state(C, |_| Idle)
            .declare_edge(A, [B])
            .declare_edge(B, [A, C])
            .declare_hop(A, C, B)
            .start(A)
            .build(&body)
            .unwrap();

        machine.request_transition(&mut body, C);
        machine.request_transition(&mut body, A);

        assert_eq!(machine.current_state(), A);
        assert_eq!(machine.carried_target(), None);

        machine.request_transition(&mut body, C);
        machine.recover(&mut body);
        assert_eq!(machine.carried_target(), None);
    }

    #[test]
    fn illegal_edge_recovers_to_start() {
        let mut body = Crate::default();
        let mut machine = abc_machine(&body);
        machine.request_transition(&mut body, B);
        let cancellations = machine.stats().cancellations;

        body.transform.position = Vec3::new(4.0, 0.0, 0.0);
        let outcome = machine.request_transition(&mut body, A);

        assert!(outcome.is_recovery());
        assert_eq!(machine.current_state(), A);
        assert_eq!(machine.stats().cancellations, cancellations + 1);
        assert_eq!(machine.stats().recoveries, 1);
        assert_eq!(body.transform.position, Vec3::ZERO);
        assert!(machine.has_active_task());
    }

    #[test]
    fn sentinel_request_is_ignored() {
        let mut body = Crate::default();
        let mut machine = abc_machine(&body);

        let outcome = machine.request_transition(&mut body, StateId::NOT_A_STATE);

        assert_eq!(outcome, TransitionOutcome::Ignored);
        assert_eq!(machine.current_state(), A);
        assert_eq!(machine.stats().cancellations, 0);
    }

    #[test]
    fn completion_without_follow_up_idles() {
        let mut body = Crate::default();
        let world = Targets::default();
        let mut machine = abc_machine(&body);
        machine.request_transition(&mut body, B);

        let step = machine.tick(&mut body, &world, 0.1);

        assert_eq!(step, Step::done());
        assert_eq!(machine.current_state(), B);
        assert!(machine.has_active_task());
        assert_eq!(machine.tick(&mut body, &world, 0.1), Step::Continue);
    }

    #[test]
    fn outcome_landed_state() {
        assert_eq!(TransitionOutcome::Direct { from: A, to: B }.landed(), Some(B));
        assert_eq!(TransitionOutcome::Ignored.landed(), None);
    }
}
