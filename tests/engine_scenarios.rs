//! Engine behavior with hand-built descriptors.

mod common;

use common::{init_tracing, Crate};
use smartstate::builder::{BuildError, ConfigurationError, MachineBuilder};
use smartstate::core::{StateId, Transform, TransitionKind, Vec3};
use smartstate::engine::{Idle, Machine, MachineStatus, Step, TaskContext, TransitionOutcome};
use smartstate::world::Targets;

const A: StateId = StateId::new(1);
const B: StateId = StateId::new(2);
const C: StateId = StateId::new(3);

fn two_state(body: &Crate) -> Machine<Crate> {
    init_tracing();
    MachineBuilder::new()
        .name("pair")
        .register_state(A, |_| Idle)
        .register_state(B, |_| Idle)
        .declare_edge(A, [B])
        .declare_edge(B, [A])
        .start(A)
        .build(body)
        .unwrap()
}

#[test]
fn two_states_flip_and_recover_from_self_request() {
    let mut body = Crate {
        transform: Transform::at(Vec3::new(1.0, 0.0, 0.0)),
    };
    let mut machine = two_state(&body);

    assert_eq!(
        machine.request_transition(&mut body, B),
        TransitionOutcome::Direct { from: A, to: B }
    );
    assert_eq!(
        machine.request_transition(&mut body, A),
        TransitionOutcome::Direct { from: B, to: A }
    );

    body.transform.position = Vec3::new(5.0, 5.0, 5.0);
    let outcome = machine.request_transition(&mut body, A);

    assert_eq!(
        outcome,
        TransitionOutcome::Recovered {
            from: A,
            requested: A,
            target: A,
        }
    );
    assert_eq!(body.transform.position, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(machine.stats().recoveries, 1);
    assert_eq!(machine.status(), MachineStatus::Idle);

    let kinds: Vec<TransitionKind> = machine
        .history()
        .transitions()
        .iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TransitionKind::Direct,
            TransitionKind::Direct,
            TransitionKind::Recovery,
            TransitionKind::Recovery
        ]
    );
}

#[test]
fn declared_edge_into_bad_state_leaves_next_tick() {
    init_tracing();
    let mut body = Crate::default();
    let mut machine = MachineBuilder::new()
        .register_state(A, |_| Idle)
        .declare_edge(A, [StateId::BAD_STATE])
        .start(A)
        .build(&body)
        .unwrap();

    machine.request_transition(&mut body, StateId::BAD_STATE);
    assert_eq!(machine.current_state(), StateId::BAD_STATE);

    let step = machine.tick(&mut body, &Targets::default(), 0.1);

    assert_eq!(step, Step::then(A));
    assert_eq!(machine.current_state(), A);
    assert_eq!(machine.stats().recoveries, 0);
}

#[test]
fn completed_task_is_replaced_by_idle() {
    init_tracing();
    let mut body = Crate::default();
    let mut machine = MachineBuilder::new()
        .register_state(A, |_| |_cx: &mut TaskContext<'_, Crate>| Step::done())
        .start(A)
        .build(&body)
        .unwrap();
    let world = Targets::default();

    assert_eq!(machine.tick(&mut body, &world, 0.1), Step::done());
    assert!(machine.has_active_task());
    assert_eq!(machine.tick(&mut body, &world, 0.1), Step::Continue);
    assert_eq!(machine.current_state(), A);
}

#[test]
fn hop_carries_target_to_intermediate_task() {
    init_tracing();
    let mut body = Crate::default();
    let mut machine = MachineBuilder::new()
        .register_state(A, |_| Idle)
        .register_state(B, |seed: smartstate::engine::TaskSeed| {
            let carry = seed.carry;
            move |_cx: &mut TaskContext<'_, Crate>| match carry {
                Some(next) => Step::then(next),
                None => Step::Continue,
            }
        })
        .register_state(C, |_| Idle)
        .declare_edge(A, [B])
        .declare_edge(B, [C])
        .declare_hop(A, C, B)
        .start(A)
        .build(&body)
        .unwrap();

    let outcome = machine.request_transition(&mut body, C);
    assert_eq!(
        outcome,
        TransitionOutcome::Hopped {
            from: A,
            via: B,
            toward: C,
        }
    );

    machine.tick(&mut body, &Targets::default(), 0.1);

    assert_eq!(machine.current_state(), C);
    assert_eq!(machine.history().get_path(), vec![A, B, C]);
    assert_eq!(machine.stats().hops, 1);
}

#[test]
fn missing_start_task_idles_after_recovery() {
    init_tracing();
    let mut body = Crate::default();
    let mut machine = MachineBuilder::new()
        .register_state(B, |_| Idle)
        .start(A)
        .build(&body)
        .unwrap();

    let outcome = machine.request_transition(&mut body, C);

    assert!(outcome.is_recovery());
    assert_eq!(machine.current_state(), A);
    assert!(machine.has_active_task());
    assert_eq!(
        machine.tick(&mut body, &Targets::default(), 0.1),
        Step::Continue
    );
}

#[test]
fn configuration_errors_are_reported_together() {
    init_tracing();
    let result = MachineBuilder::new()
        .register_state(A, |_| Idle)
        .declare_edge(A, [B])
        .declare_hop(A, StateId::new(9), C)
        .start(A)
        .recover_to(StateId::new(7))
        .build(&Crate::default());

    let err = match result {
        Err(err @ BuildError::Configuration(_)) => err,
        Err(other) => panic!("unexpected build error: {other}"),
        Ok(_) => panic!("descriptor should not build"),
    };
    let errors = err.configuration_errors();

    assert!(errors.contains(&ConfigurationError::MissingFactory {
        state: B,
        referenced_by: "edge #1 -> #2 (target)".to_string(),
    }));
    assert!(errors.contains(&ConfigurationError::IllegalHop {
        from: A,
        toward: StateId::new(9),
        via: C,
    }));
    assert!(errors.contains(&ConfigurationError::MissingRecoveryTarget {
        target: StateId::new(7),
    }));
    assert_eq!(errors.len(), 4);
}

#[test]
fn explicit_recovery_target_overrides_start() {
    init_tracing();
    let mut body = Crate::default();
    let mut machine = MachineBuilder::new()
        .register_state(A, |_| Idle)
        .register_state(B, |_| Idle)
        .declare_edge(A, [B])
        .start(A)
        .recover_to(B)
        .build(&body)
        .unwrap();

    let outcome = machine.request_transition(&mut body, C);

    assert_eq!(outcome.landed(), Some(B));
    assert_eq!(machine.recovery_target(), B);
    assert!(machine.graph().is_legal(StateId::BAD_STATE, B));
}
