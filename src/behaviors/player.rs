//! The player avatar.
//!
//! The host feeds movement input once per tick; the avatar turns it into
//! an impulse and reports whether it is moving. Throwables read its hand
//! positions and throw strength.

use crate::behaviors::config::{from_json, Checker, ConfigError};
use crate::behaviors::throwable::throw_impulse;
use crate::behaviors::BehaviorError;
use crate::builder::MachineBuilder;
use crate::core::{State, Transform, Vec3};
use crate::engine::{Idle, Machine, Step, TransitionOutcome};
use crate::state_enum;
use crate::world::{Actuator, Body, World};
use serde::{Deserialize, Serialize};

/// Input below this length counts as no input.
const INPUT_DEAD_ZONE: f32 = 1e-4;

state_enum! {
    /// States of the player avatar.
    pub enum PlayerState {
        Rest = 0,
        Moving = 1,
    }
}

/// Player parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    /// Force behind a throw.
    pub strength: f32,
    pub left_hand: Vec3,
    pub right_hand: Vec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            strength: 10.0,
            left_hand: Vec3::new(-0.6, 0.0, 0.0),
            right_hand: Vec3::new(0.6, 0.0, 0.0),
        }
    }
}

impl PlayerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = from_json("player", json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Checker::new("player")
            .non_negative(self.speed, "speed")
            .non_negative(self.strength, "strength")
            .finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerBody {
    pub transform: Transform,
    impulse: Vec3,
}

impl PlayerBody {
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

impl Body for PlayerBody {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }
}

impl Actuator for PlayerBody {
    fn apply_impulse(&mut self, impulse: Vec3) {
        self.impulse = self.impulse + impulse;
    }
}

/// The player avatar driven by the shared engine.
pub struct Player {
    machine: Machine<PlayerBody>,
    body: PlayerBody,
    config: PlayerConfig,
}

impl Player {
    pub fn new(config: PlayerConfig, body: PlayerBody) -> Result<Self, BehaviorError> {
        config.validate()?;
        let machine = Self::descriptor().build(&body)?;
        Ok(Self {
            machine,
            body,
            config,
        })
    }

    pub fn descriptor() -> MachineBuilder<PlayerBody> {
        MachineBuilder::new()
            .name("player")
            .state(PlayerState::Rest, |_| Idle)
            .state(PlayerState::Moving, |_| Idle)
            .declare_edge(PlayerState::Rest, [PlayerState::Moving])
            .declare_edge(PlayerState::Moving, [PlayerState::Rest])
            .start(PlayerState::Rest)
    }

    pub fn tick(&mut self, world: &dyn World, delta: f32) -> Step {
        self.machine.tick(&mut self.body, world, delta)
    }

    pub fn state(&self) -> Option<PlayerState> {
        PlayerState::from_id(self.machine.current_state())
    }

    /// Apply one tick of movement input.
    ///
    /// Returns the transition taken when the avatar starts or stops moving.
    pub fn drive(&mut self, input: Vec3, delta: f32) -> Option<TransitionOutcome> {
        let moving = input.length() > INPUT_DEAD_ZONE;
        if moving {
            self.body
                .apply_impulse(input * (self.config.speed * delta));
        }
        match (self.state()?, moving) {
            (PlayerState::Rest, true) => Some(self.request(PlayerState::Moving)),
            (PlayerState::Moving, false) => Some(self.request(PlayerState::Rest)),
            _ => None,
        }
    }

    /// World position of a hand.
    pub fn hand_position(&self, right: bool) -> Vec3 {
        let offset = if right {
            self.config.right_hand
        } else {
            self.config.left_hand
        };
        self.body.position() + offset
    }

    /// Impulse this player gives a throw along `forward`.
    pub fn throw_impulse(&self, forward: Vec3) -> Vec3 {
        throw_impulse(forward, self.config.strength)
    }

    fn request(&mut self, target: PlayerState) -> TransitionOutcome {
        self.machine.request_transition(&mut self.body, target)
    }

    pub fn machine(&self) -> &Machine<PlayerBody> {
        &self.machine
    }

    pub fn body(&self) -> &PlayerBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut PlayerBody {
        &mut self.body
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }
}
