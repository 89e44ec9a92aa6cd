//! A target that counts hits from thrown objects.
//!
//! Each projectile counts once per contact, and only if its layer is one
//! the target accepts. The target reads STRUCK while any counted projectile
//! is still touching it.

use crate::behaviors::config::{from_json, Checker, ConfigError};
use crate::behaviors::BehaviorError;
use crate::builder::MachineBuilder;
use crate::core::{State, Transform, Vec3};
use crate::engine::{Idle, Machine, Step, TransitionOutcome};
use crate::state_enum;
use crate::world::{Body, World};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

state_enum! {
    /// States of a target.
    pub enum TargetState {
        Ready = 0,
        Struck = 1,
    }
}

/// Target parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Projectile layers that count as hits.
    pub hit_layers: Vec<u32>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            hit_layers: vec![8],
        }
    }
}

impl TargetConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = from_json("target", json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Checker::new("target")
            .ensure(
                self.hit_layers.iter().all(|layer| *layer < 32),
                "hit_layers",
                "must all be below 32",
            )
            .finish()
    }

    /// Bit mask of the accepted layers, as reported in ray hits.
    pub fn layer_mask(&self) -> u32 {
        self.hit_layers
            .iter()
            .filter(|layer| **layer < 32)
            .fold(0u32, |mask, &layer| mask | (1 << layer))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetBody {
    pub transform: Transform,
}

impl TargetBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::at(position),
        }
    }
}

impl Body for TargetBody {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }
}

/// A target driven by the shared engine.
pub struct Target {
    machine: Machine<TargetBody>,
    body: TargetBody,
    config: TargetConfig,
    contacts: HashSet<u64>,
    hits: u32,
}

impl Target {
    pub fn new(config: TargetConfig, body: TargetBody) -> Result<Self, BehaviorError> {
        config.validate()?;
        let machine = Self::descriptor().build(&body)?;
        Ok(Self {
            machine,
            body,
            config,
            contacts: HashSet::new(),
            hits: 0,
        })
    }

    pub fn descriptor() -> MachineBuilder<TargetBody> {
        MachineBuilder::new()
            .name("target")
            .state(TargetState::Ready, |_| Idle)
            .state(TargetState::Struck, |_| Idle)
            .declare_edge(TargetState::Ready, [TargetState::Struck])
            .declare_edge(TargetState::Struck, [TargetState::Ready])
            .start(TargetState::Ready)
    }

    pub fn tick(&mut self, world: &dyn World, delta: f32) -> Step {
        self.machine.tick(&mut self.body, world, delta)
    }

    pub fn state(&self) -> Option<TargetState> {
        TargetState::from_id(self.machine.current_state())
    }

    /// Whether a projectile on `layer` counts as a hit.
    pub fn can_hit(&self, layer: u32) -> bool {
        layer < 32 && self.config.layer_mask() & (1 << layer) != 0
    }

    pub fn layer_mask(&self) -> u32 {
        self.config.layer_mask()
    }

    /// A projectile touched the target. Returns whether it counted as a
    /// new hit.
    pub fn on_collision_enter(&mut self, projectile: u64, layer: u32) -> bool {
        if !self.can_hit(layer) || !self.contacts.insert(projectile) {
            return false;
        }
        self.hits += 1;
        debug!(projectile, hits = self.hits, "target hit");
        if self.state() == Some(TargetState::Ready) {
            self.request(TargetState::Struck);
        }
        true
    }

    /// A projectile stopped touching the target.
    pub fn on_collision_exit(&mut self, projectile: u64) {
        if self.contacts.remove(&projectile)
            && self.contacts.is_empty()
            && self.state() == Some(TargetState::Struck)
        {
            self.request(TargetState::Ready);
        }
    }

    pub fn hit_count(&self) -> u32 {
        self.hits
    }

    fn request(&mut self, target: TargetState) -> TransitionOutcome {
        self.machine.request_transition(&mut self.body, target)
    }

    pub fn machine(&self) -> &Machine<TargetBody> {
        &self.machine
    }

    pub fn body(&self) -> &TargetBody {
        &self.body
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }
}
