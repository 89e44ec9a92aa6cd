//! An object the player can pick up and throw at targets.

use crate::behaviors::config::{from_json, Checker, ConfigError};
use crate::behaviors::BehaviorError;
use crate::builder::MachineBuilder;
use crate::core::{State, Transform, Vec3};
use crate::engine::{Idle, Machine, StateTask, Step, TaskContext, TransitionOutcome};
use crate::state_enum;
use crate::world::{Actuator, Body, World, PLAYER};
use serde::{Deserialize, Serialize};

state_enum! {
    /// States of a throwable object.
    pub enum ThrowableState {
        Rest = 0,
        Pickup = 1,
        Throw = 2,
        Flying = 3,
    }
}

/// Throwable parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowableConfig {
    /// Layer the object itself sits on; rays for pick-up look here.
    pub pick_up_layer: u32,
    /// Layer targets sit on; rays for throwing look here.
    pub throw_layer: u32,
    /// Layer of surfaces the object comes to rest on.
    pub rest_layer: u32,
    pub pick_up_range: f32,
    pub throw_range: f32,
    pub throw_force: f32,
    /// Where the object is held, relative to the player.
    pub hand_offset: Vec3,
}

impl Default for ThrowableConfig {
    fn default() -> Self {
        Self {
            pick_up_layer: 8,
            throw_layer: 9,
            rest_layer: 10,
            pick_up_range: 2.0,
            throw_range: 10.0,
            throw_force: 10.0,
            hand_offset: Vec3::new(0.6, 0.0, 0.0),
        }
    }
}

impl ThrowableConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = from_json("throwable", json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Checker::new("throwable")
            .non_negative(self.pick_up_range, "pick_up_range")
            .non_negative(self.throw_range, "throw_range")
            .non_negative(self.throw_force, "throw_force")
            .ensure(self.pick_up_layer < 32, "pick_up_layer", "must be below 32")
            .ensure(self.throw_layer < 32, "throw_layer", "must be below 32")
            .ensure(self.rest_layer < 32, "rest_layer", "must be below 32")
            .finish()
    }
}

/// A rigid body that accumulates impulses until the host applies them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThrowableBody {
    pub transform: Transform,
    impulse: Vec3,
}

impl ThrowableBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::at(position),
            impulse: Vec3::ZERO,
        }
    }

    pub fn take_impulse(&mut self) -> Vec3 {
        std::mem::replace(&mut self.impulse, Vec3::ZERO)
    }
}

impl Body for ThrowableBody {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }
}

impl Actuator for ThrowableBody {
    fn apply_impulse(&mut self, impulse: Vec3) {
        self.impulse = self.impulse + impulse;
    }
}

/// Impulse for a throw along `forward`, lifted slightly.
pub fn throw_impulse(forward: Vec3, force: f32) -> Vec3 {
    (forward + Vec3::UP * 0.01) * force
}

struct RestTask {
    range: f32,
    layer: u32,
}

impl StateTask<ThrowableBody> for RestTask {
    fn step(&mut self, cx: &mut TaskContext<'_, ThrowableBody>) -> Step {
        match cx.world.raycast(PLAYER, self.range, self.layer) {
            Some(_) => Step::to(ThrowableState::Pickup),
            None => Step::Continue,
        }
    }
}

/// Carried in the player's hand until they aim at a target.
struct PickupTask {
    hand_offset: Vec3,
    range: f32,
    target_layer: u32,
    own_layer: u32,
}

impl StateTask<ThrowableBody> for PickupTask {
    fn step(&mut self, cx: &mut TaskContext<'_, ThrowableBody>) -> Step {
        let Some(player) = cx.world.target_position(PLAYER) else {
            return Step::Continue;
        };
        cx.body.set_position(player + self.hand_offset);

        match cx.world.raycast(PLAYER, self.range, self.target_layer) {
            Some(hit) if hit.accepts(self.own_layer) => Step::to(ThrowableState::Throw),
            _ => Step::Continue,
        }
    }
}

struct ThrowTask {
    force: f32,
}

impl StateTask<ThrowableBody> for ThrowTask {
    fn step(&mut self, cx: &mut TaskContext<'_, ThrowableBody>) -> Step {
        let forward = cx.world.target_forward(PLAYER).unwrap_or(Vec3::FORWARD);
        cx.body.apply_impulse(throw_impulse(forward, self.force));
        Step::to(ThrowableState::Flying)
    }
}

/// A throwable driven by the shared engine.
pub struct Throwable {
    machine: Machine<ThrowableBody>,
    body: ThrowableBody,
    config: ThrowableConfig,
}

impl Throwable {
    pub fn new(config: ThrowableConfig, body: ThrowableBody) -> Result<Self, BehaviorError> {
        config.validate()?;
        let machine = Self::descriptor(&config).build(&body)?;
        Ok(Self {
            machine,
            body,
            config,
        })
    }

    pub fn descriptor(config: &ThrowableConfig) -> MachineBuilder<ThrowableBody> {
        use ThrowableState::*;

        let config = *config;

        MachineBuilder::new()
            .name("throwable")
            .state(Rest, move |_| RestTask {
                range: config.pick_up_range,
                layer: config.pick_up_layer,
            })
            .state(Pickup, move |_| PickupTask {
                hand_offset: config.hand_offset,
                range: config.throw_range,
                target_layer: config.throw_layer,
                own_layer: config.pick_up_layer,
            })
            .state(Throw, move |_| ThrowTask {
                force: config.throw_force,
            })
            .state(Flying, |_| Idle)
            .declare_edge(Rest, [Pickup, Flying])
            .declare_edge(Pickup, [Throw])
            .declare_edge(Throw, [Flying])
            .declare_edge(Flying, [Rest])
            .start(Rest)
    }

    pub fn tick(&mut self, world: &dyn World, delta: f32) -> Step {
        self.machine.tick(&mut self.body, world, delta)
    }

    pub fn state(&self) -> Option<ThrowableState> {
        ThrowableState::from_id(self.machine.current_state())
    }

    pub fn request(&mut self, target: ThrowableState) -> TransitionOutcome {
        self.machine.request_transition(&mut self.body, target)
    }

    /// Layer targets must accept for this object to count as a hit.
    pub fn layer(&self) -> u32 {
        self.config.pick_up_layer
    }

    /// Contact with a surface on `layer` began. A flying object landing on
    /// a resting surface comes to rest.
    pub fn on_collision_enter(&mut self, layer: u32) -> Option<TransitionOutcome> {
        if layer != self.config.rest_layer || self.state()? != ThrowableState::Flying {
            return None;
        }
        Some(self.request(ThrowableState::Rest))
    }

    /// Contact with a surface on `layer` ended. A resting object knocked
    /// off its surface is flying again.
    pub fn on_collision_exit(&mut self, layer: u32) -> Option<TransitionOutcome> {
        if layer != self.config.rest_layer || self.state()? != ThrowableState::Rest {
            return None;
        }
        Some(self.request(ThrowableState::Flying))
    }

    pub fn machine(&self) -> &Machine<ThrowableBody> {
        &self.machine
    }

    pub fn body(&self) -> &ThrowableBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut ThrowableBody {
        &mut self.body
    }

    pub fn config(&self) -> &ThrowableConfig {
        &self.config
    }
}
