//! End-to-end door scenarios driven tick by tick.

mod common;

use common::{init_tracing, player_at};
use smartstate::behaviors::door::KEY;
use smartstate::behaviors::{Door, DoorBody, DoorConfig, DoorState};
use smartstate::core::{State, StateId, Vec3};
use smartstate::engine::TransitionOutcome;
use smartstate::world::{Body, Targets, World};

const CLOSED_AT: Vec3 = Vec3::new(0.0, 0.0, 0.0);
const OPEN_AT: Vec3 = Vec3::new(0.0, 0.0, 2.0);

fn door(start: DoorState, automatic: bool) -> Door {
    init_tracing();
    let config = DoorConfig {
        start,
        automatic,
        closed_position: CLOSED_AT,
        open_position: OPEN_AT,
        ..DoorConfig::default()
    };
    let at = if start == DoorState::Open {
        OPEN_AT
    } else {
        CLOSED_AT
    };
    Door::new(config, DoorBody::at(at)).unwrap()
}

/// Tick until the door sits in `state`, giving up after `limit` ticks.
fn run_until(door: &mut Door, world: &dyn World, state: DoorState, limit: usize) -> usize {
    for tick in 0..limit {
        if door.state() == Some(state) {
            return tick;
        }
        door.tick(world, 0.5);
    }
    assert_eq!(door.state(), Some(state), "door never reached {state:?}");
    limit
}

fn ids(states: &[DoorState]) -> Vec<StateId> {
    states.iter().map(|s| s.id()).collect()
}

#[test]
fn open_to_locked_walks_every_intermediate_state() {
    let mut door = door(DoorState::Open, false);
    let world = player_at(Vec3::new(50.0, 0.0, 0.0));

    let outcome = door.request(DoorState::Locked);
    assert_eq!(
        outcome,
        TransitionOutcome::Hopped {
            from: DoorState::Open.id(),
            via: DoorState::Ajar.id(),
            toward: DoorState::Locked.id(),
        }
    );

    run_until(&mut door, &world, DoorState::Locked, 20);

    assert_eq!(
        door.machine().history().get_path(),
        ids(&[
            DoorState::Open,
            DoorState::Ajar,
            DoorState::Closed,
            DoorState::Locked
        ])
    );
    assert_eq!(door.body().position(), CLOSED_AT);
    assert_eq!(door.machine().stats().recoveries, 0);
}

#[test]
fn travel_takes_distance_over_speed() {
    let mut door = door(DoorState::Closed, false);
    let world = player_at(Vec3::ZERO);

    door.request(DoorState::Open);
    // 2 units at 1 unit/s in 0.5 s ticks
    let ticks = run_until(&mut door, &world, DoorState::Open, 20);

    assert_eq!(ticks, 4);
    assert_eq!(door.body().position(), OPEN_AT);
}

#[test]
fn automatic_door_follows_player() {
    let mut door = door(DoorState::Closed, true);
    let mut world = player_at(Vec3::new(0.0, 0.0, 1.0));

    run_until(&mut door, &world, DoorState::Open, 20);
    assert_eq!(door.body().position(), OPEN_AT);

    world.set_position(0, Vec3::new(0.0, 0.0, 10.0));
    run_until(&mut door, &world, DoorState::Closed, 20);
    assert_eq!(door.body().position(), CLOSED_AT);

    // stays shut while the player keeps away
    for _ in 0..5 {
        door.tick(&world, 0.5);
    }
    assert_eq!(door.state(), Some(DoorState::Closed));
}

#[test]
fn toggle_needs_manual_door_and_nearby_player() {
    let mut manual = door(DoorState::Closed, false);
    assert_eq!(manual.toggle_door(&player_at(Vec3::new(20.0, 0.0, 0.0))), None);

    let near = player_at(Vec3::new(5.0, 0.0, 0.0));
    let outcome = manual.toggle_door(&near).unwrap();
    assert!(matches!(outcome, TransitionOutcome::Hopped { .. }));
    assert_eq!(manual.state(), Some(DoorState::Ajar));

    // mid-travel toggles are ignored
    assert_eq!(manual.toggle_door(&near), None);

    let mut automatic = door(DoorState::Closed, true);
    assert_eq!(automatic.toggle_door(&near), None);
}

#[test]
fn key_locks_and_unlocks() {
    let mut door = door(DoorState::Locked, false);
    let far_key = Targets::new([Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)]);
    let near_key = Targets::new([Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0)]);
    assert_eq!(KEY, 1);

    assert_eq!(door.use_key(&far_key), None);
    assert_eq!(door.state(), Some(DoorState::Locked));

    // a locked door does not toggle
    assert_eq!(door.toggle_door(&near_key), None);

    let unlocked = door.use_key(&near_key).unwrap();
    assert!(matches!(unlocked, TransitionOutcome::Direct { .. }));
    assert_eq!(door.state(), Some(DoorState::Closed));

    door.use_key(&near_key);
    assert_eq!(door.state(), Some(DoorState::Locked));
}

#[test]
fn key_locks_open_door_through_closing() {
    let mut door = door(DoorState::Open, false);
    let world = Targets::new([Vec3::new(50.0, 0.0, 0.0), OPEN_AT]);

    let outcome = door.use_key(&world).unwrap();
    assert_eq!(outcome.landed(), Some(DoorState::Ajar.id()));

    run_until(&mut door, &world, DoorState::Locked, 20);
    assert_eq!(door.body().position(), CLOSED_AT);
}

#[test]
fn illegal_request_restores_snapshot() {
    let mut door = door(DoorState::Closed, false);
    let world = player_at(Vec3::ZERO);

    door.request(DoorState::Open);
    run_until(&mut door, &world, DoorState::Open, 20);
    assert_eq!(door.body().position(), OPEN_AT);

    let outcome = door.request(DoorState::Open);

    assert!(outcome.is_recovery());
    assert_eq!(door.state(), Some(DoorState::Closed));
    assert_eq!(door.body().position(), CLOSED_AT);
    assert!(door
        .machine()
        .history()
        .get_path()
        .contains(&StateId::BAD_STATE));
    assert_eq!(door.machine().pending_state(), StateId::NOT_A_STATE);
}

#[test]
fn interrupting_travel_discards_progress() {
    let mut door = door(DoorState::Closed, false);
    let world = player_at(Vec3::ZERO);

    door.request(DoorState::Open);
    door.tick(&world, 0.5);
    door.tick(&world, 0.5);
    let cancellations = door.machine().stats().cancellations;

    let outcome = door.request(DoorState::Closed);

    assert!(matches!(outcome, TransitionOutcome::Direct { .. }));
    assert_eq!(door.state(), Some(DoorState::Closed));
    assert_eq!(door.machine().stats().cancellations, cancellations + 1);
    assert!(door.machine().has_active_task());
}

#[test]
fn door_config_from_json() {
    let config = DoorConfig::from_json(
        r#"{
            "start": "Open",
            "open_speed": 4.0,
            "open_position": { "x": 0.0, "y": 0.0, "z": 2.0 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.start, DoorState::Open);
    assert_eq!(config.open_speed, 4.0);
    assert_eq!(config.open_position, OPEN_AT);
    assert!(!config.automatic);

    assert!(DoorConfig::from_json(r#"{ "open_speed": -1.0 }"#).is_err());
}
