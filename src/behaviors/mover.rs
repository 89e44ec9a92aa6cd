//! An object that drifts with the player.
//!
//! Out of range it rests. Within `follow_distance` it is pulled toward the
//! player; within `gap_distance` it is pulled or pushed twice as hard,
//! depending on whether it attracts or repels.

use crate::behaviors::config::{from_json, Checker, ConfigError};
use crate::behaviors::BehaviorError;
use crate::builder::MachineBuilder;
use crate::core::{State, Transform, Vec3};
use crate::engine::{Machine, StateTask, Step, TaskContext, TaskSeed, TransitionOutcome};
use crate::state_enum;
use crate::world::{Actuator, Body, World, PLAYER};
use serde::{Deserialize, Serialize};

state_enum! {
    /// States of a mover.
    pub enum MoverState {
        Rest = 0,
        Follow = 1,
        Gap = 2,
    }
}

/// Mover parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverConfig {
    /// Pull toward the player inside the gap instead of pushing away.
    pub attract: bool,
    pub follow_distance: f32,
    pub gap_distance: f32,
    /// Impulse magnitude per tick in the follow band.
    pub scaling: f32,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            attract: false,
            follow_distance: 25.0,
            gap_distance: 15.0,
            scaling: 1.0,
        }
    }
}

impl MoverConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = from_json("mover", json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Checker::new("mover")
            .non_negative(self.gap_distance, "gap_distance")
            .ensure(
                self.gap_distance < self.follow_distance,
                "follow_distance",
                "must be greater than gap_distance",
            )
            .non_negative(self.scaling, "scaling")
            .finish()
    }

    /// State for a player at `distance`.
    pub fn band_for(&self, distance: f32) -> MoverState {
        if distance <= self.gap_distance {
            MoverState::Gap
        } else if distance <= self.follow_distance {
            MoverState::Follow
        } else {
            MoverState::Rest
        }
    }
}

/// A rigid body that accumulates impulses until the host applies them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoverBody {
    pub transform: Transform,
    impulse: Vec3,
}

impl MoverBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::at(position),
            impulse: Vec3::ZERO,
        }
    }

    /// Impulse accumulated since the last call.
    pub fn take_impulse(&mut self) -> Vec3 {
        std::mem::replace(&mut self.impulse, Vec3::ZERO)
    }
}

impl Body for MoverBody {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }
}

impl Actuator for MoverBody {
    fn apply_impulse(&mut self, impulse: Vec3) {
        self.impulse = self.impulse + impulse;
    }
}

struct BandTask {
    state: MoverState,
    config: MoverConfig,
}

impl StateTask<MoverBody> for BandTask {
    fn step(&mut self, cx: &mut TaskContext<'_, MoverBody>) -> Step {
        let Some(player) = cx.world.target_position(PLAYER) else {
            return Step::Continue;
        };
        let position = cx.body.position();
        let band = self.config.band_for(position.distance(player));
        if band != self.state {
            return Step::to(band);
        }

        let toward = (player - position).normalize();
        match self.state {
            MoverState::Rest => {}
            MoverState::Follow => cx.body.apply_impulse(toward * self.config.scaling),
            MoverState::Gap => {
                let push = toward * (2.0 * self.config.scaling);
                cx.body.apply_impulse(if self.config.attract { push } else { -push });
            }
        }
        Step::Continue
    }
}

fn band_task(
    state: MoverState,
    config: MoverConfig,
) -> impl Fn(TaskSeed) -> BandTask + Send + Sync + 'static {
    move |_| BandTask { state, config }
}

/// A mover driven by the shared engine.
pub struct Mover {
    machine: Machine<MoverBody>,
    body: MoverBody,
    config: MoverConfig,
}

impl Mover {
    pub fn new(config: MoverConfig, body: MoverBody) -> Result<Self, BehaviorError> {
        config.validate()?;
        let machine = Self::descriptor(&config).build(&body)?;
        Ok(Self {
            machine,
            body,
            config,
        })
    }

    pub fn descriptor(config: &MoverConfig) -> MachineBuilder<MoverBody> {
        use MoverState::*;

        let config = *config;
        let band = |state| band_task(state, config);

        MachineBuilder::new()
            .name("mover")
            .state(Rest, band(Rest))
            .state(Follow, band(Follow))
            .state(Gap, band(Gap))
            .declare_edge(Rest, [Follow, Gap])
            .declare_edge(Follow, [Rest, Gap])
            .declare_edge(Gap, [Rest, Follow])
            .start(Rest)
    }

    pub fn tick(&mut self, world: &dyn World, delta: f32) -> Step {
        self.machine.tick(&mut self.body, world, delta)
    }

    pub fn state(&self) -> Option<MoverState> {
        MoverState::from_id(self.machine.current_state())
    }

    pub fn request(&mut self, target: MoverState) -> TransitionOutcome {
        self.machine.request_transition(&mut self.body, target)
    }

    pub fn machine(&self) -> &Machine<MoverBody> {
        &self.machine
    }

    pub fn body(&self) -> &MoverBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut MoverBody {
        &mut self.body
    }

    pub fn config(&self) -> &MoverConfig {
        &self.config
    }
}
