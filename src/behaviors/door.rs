//! A sliding door.
//!
//! A closed door must pass through AJAR before it is open and the other
//! way round; an open door must close before it can be locked. Those
//! routes are hops in the descriptor, so a single request for the final
//! state walks every intermediate state in order.

use crate::behaviors::config::{from_json, Checker, ConfigError};
use crate::behaviors::BehaviorError;
use crate::builder::MachineBuilder;
use crate::core::{ease, is_valid_ease_factor, ProximityGuard, State, StateId, Transform, Vec3};
use crate::engine::{Idle, Machine, StateTask, Step, TaskContext, TaskSeed, TransitionOutcome};
use crate::state_enum;
use crate::world::{Body, World, PLAYER};
use serde::{Deserialize, Serialize};

/// Tracked-target index of the door's key.
pub const KEY: usize = 1;

state_enum! {
    /// States of a sliding door.
    pub enum DoorState {
        Open = 0,
        Ajar = 1,
        Closed = 2,
        Locked = 3,
    }
}

/// Door parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    pub start: DoorState,
    /// Opens and closes by itself as the player approaches and leaves.
    pub automatic: bool,
    /// Travel speed in units per second.
    pub open_speed: f32,
    /// Player distance from the closed anchor that opens an automatic door.
    pub open_distance: f32,
    /// How close the key must be to lock or unlock.
    pub unlock_distance: f32,
    /// How close the player must be to toggle a manual door.
    pub interact_distance: f32,
    pub closed_position: Vec3,
    pub open_position: Vec3,
    pub ease_factor: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            start: DoorState::Locked,
            automatic: false,
            open_speed: 1.0,
            open_distance: 2.0,
            unlock_distance: 1.0,
            interact_distance: 10.0,
            closed_position: Vec3::ZERO,
            open_position: Vec3::ZERO,
            ease_factor: 1.0,
        }
    }
}

impl DoorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = from_json("door", json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Checker::new("door")
            .positive(self.open_speed, "open_speed")
            .non_negative(self.open_distance, "open_distance")
            .non_negative(self.unlock_distance, "unlock_distance")
            .non_negative(self.interact_distance, "interact_distance")
            .ensure(
                is_valid_ease_factor(self.ease_factor),
                "ease_factor",
                "must lie in [0, 2]",
            )
            .finish()
    }
}

/// The door panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DoorBody {
    pub transform: Transform,
}

impl DoorBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::at(position),
        }
    }
}

impl Body for DoorBody {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }
}

#[derive(Clone, Copy, Debug)]
struct Travel {
    closed: Vec3,
    open: Vec3,
    speed: f32,
    ease_factor: f32,
}

#[derive(Clone, Copy, Debug)]
struct AutoOpen {
    enabled: bool,
    anchor: Vec3,
    distance: f32,
}

impl AutoOpen {
    fn player_distance(&self, world: &dyn World) -> Option<f32> {
        if self.enabled {
            world.distance_to(PLAYER, self.anchor)
        } else {
            None
        }
    }
}

struct OpenTask {
    auto: AutoOpen,
}

impl StateTask<DoorBody> for OpenTask {
    fn step(&mut self, cx: &mut TaskContext<'_, DoorBody>) -> Step {
        match self.auto.player_distance(cx.world) {
            Some(d) if d > self.auto.distance => Step::to(DoorState::Closed),
            _ => Step::Continue,
        }
    }
}

/// Slides the panel between the anchors, then asks for the state it was
/// heading to.
struct AjarTask {
    from: Vec3,
    to: Vec3,
    toward: StateId,
    distance: f32,
    progress: f32,
    speed: f32,
    ease_factor: f32,
}

impl AjarTask {
    fn new(seed: TaskSeed, travel: Travel) -> Self {
        let toward = seed.carry.unwrap_or_else(|| {
            if seed.previous == DoorState::Closed.id() {
                DoorState::Open.id()
            } else {
                DoorState::Closed.id()
            }
        });
        let (from, to) = if toward == DoorState::Open.id() {
            (travel.closed, travel.open)
        } else {
            (travel.open, travel.closed)
        };
        Self {
            from,
            to,
            toward,
            distance: from.distance(to),
            progress: 0.0,
            speed: travel.speed,
            ease_factor: travel.ease_factor,
        }
    }
}

impl StateTask<DoorBody> for AjarTask {
    fn step(&mut self, cx: &mut TaskContext<'_, DoorBody>) -> Step {
        if self.distance <= 0.0 {
            cx.body.set_position(self.to);
            return Step::to(self.toward);
        }

        self.progress = (self.progress + cx.delta * self.speed / self.distance).clamp(0.0, 1.0);
        let eased = ease(self.progress, self.ease_factor);
        cx.body.set_position(self.from.lerp(self.to, eased));

        if self.progress >= 1.0 {
            Step::to(self.toward)
        } else {
            Step::Continue
        }
    }
}

struct ClosedTask {
    lock_next: bool,
    auto: AutoOpen,
}

impl StateTask<DoorBody> for ClosedTask {
    fn step(&mut self, cx: &mut TaskContext<'_, DoorBody>) -> Step {
        if self.lock_next {
            return Step::to(DoorState::Locked);
        }
        match self.auto.player_distance(cx.world) {
            Some(d) if d <= self.auto.distance => Step::to(DoorState::Open),
            _ => Step::Continue,
        }
    }
}

/// A door driven by the shared engine.
pub struct Door {
    machine: Machine<DoorBody>,
    body: DoorBody,
    config: DoorConfig,
}

impl Door {
    pub fn new(config: DoorConfig, body: DoorBody) -> Result<Self, BehaviorError> {
        config.validate()?;
        let machine = Self::descriptor(&config).build(&body)?;
        Ok(Self {
            machine,
            body,
            config,
        })
    }

    /// States, tasks, edges and hops of a door.
    pub fn descriptor(config: &DoorConfig) -> MachineBuilder<DoorBody> {
        let travel = Travel {
            closed: config.closed_position,
            open: config.open_position,
            speed: config.open_speed,
            ease_factor: config.ease_factor,
        };
        let auto = AutoOpen {
            enabled: config.automatic,
            anchor: config.closed_position,
            distance: config.open_distance,
        };

        MachineBuilder::new()
            .name("door")
            .state(DoorState::Open, move |_| OpenTask { auto })
            .state(DoorState::Ajar, move |seed| AjarTask::new(seed, travel))
            .state(DoorState::Closed, move |seed: TaskSeed| ClosedTask {
                lock_next: seed.carry == Some(DoorState::Locked.id()),
                auto,
            })
            .state(DoorState::Locked, |_| Idle)
            .declare_edge(DoorState::Open, [DoorState::Ajar])
            .declare_edge(DoorState::Ajar, [DoorState::Open, DoorState::Closed])
            .declare_edge(DoorState::Closed, [DoorState::Ajar, DoorState::Locked])
            .declare_edge(DoorState::Locked, [DoorState::Closed])
            .declare_hop(DoorState::Open, DoorState::Closed, DoorState::Ajar)
            .declare_hop(DoorState::Closed, DoorState::Open, DoorState::Ajar)
            .declare_hop(DoorState::Open, DoorState::Locked, DoorState::Ajar)
            .declare_hop(DoorState::Ajar, DoorState::Locked, DoorState::Closed)
            .start(config.start)
    }

    /// Advance the door by one tick.
    pub fn tick(&mut self, world: &dyn World, delta: f32) -> Step {
        self.machine.tick(&mut self.body, world, delta)
    }

    pub fn state(&self) -> Option<DoorState> {
        DoorState::from_id(self.machine.current_state())
    }

    pub fn request(&mut self, target: DoorState) -> TransitionOutcome {
        self.machine.request_transition(&mut self.body, target)
    }

    /// Open a closed door or close an open one.
    ///
    /// Automatic doors ignore this, and the player has to be within
    /// `interact_distance`. Returns `None` when nothing was requested.
    pub fn toggle_door(&mut self, world: &dyn World) -> Option<TransitionOutcome> {
        if self.config.automatic {
            return None;
        }
        let reach = ProximityGuard::new(PLAYER, self.config.interact_distance);
        if !reach.check(world, self.body.position()) {
            return None;
        }
        match self.state()? {
            DoorState::Open => Some(self.request(DoorState::Closed)),
            DoorState::Closed => Some(self.request(DoorState::Open)),
            DoorState::Ajar | DoorState::Locked => None,
        }
    }

    /// Lock or unlock the door with the key, if the key is close enough.
    pub fn use_key(&mut self, world: &dyn World) -> Option<TransitionOutcome> {
        let reach = ProximityGuard::new(KEY, self.config.unlock_distance);
        if !reach.check(world, self.body.position()) {
            return None;
        }
        match self.state()? {
            DoorState::Locked => Some(self.request(DoorState::Closed)),
            DoorState::Closed | DoorState::Open => Some(self.request(DoorState::Locked)),
            DoorState::Ajar => None,
        }
    }

    pub fn machine(&self) -> &Machine<DoorBody> {
        &self.machine
    }

    pub fn body(&self) -> &DoorBody {
        &self.body
    }

    pub fn config(&self) -> &DoorConfig {
        &self.config
    }
}
