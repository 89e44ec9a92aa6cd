//! A proximity light.
//!
//! Left alone the light follows the player's distance with hysteresis:
//! lit up close, dark far away, flickering in between. Toggling forces it
//! on or off regardless of distance; disabling is permanent.

use crate::behaviors::config::{from_json, Checker, ConfigError};
use crate::behaviors::BehaviorError;
use crate::builder::MachineBuilder;
use crate::core::{InitSnapshot, State, Transform};
use crate::engine::{Machine, StateTask, Step, TaskContext, TransitionOutcome};
use crate::state_enum;
use crate::world::{Body, Lamp, World, PLAYER};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

state_enum! {
    /// States of a proximity light.
    pub enum LightState {
        On = 0,
        Off = 1,
        Flicker = 2,
        TurnOn = 3,
        TurnOff = 4,
        Disable = 5,
    }
    final: [Disable]
}

/// Light parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub start: LightState,
    /// At or inside this player distance the light is on.
    pub on_distance: f32,
    /// At or beyond this player distance the light is off.
    pub off_distance: f32,
    /// Seconds between heartbeats of a disabled light.
    pub disable_timer: f32,
    /// Upper bound of the random wait between flicker toggles.
    pub max_flicker_wait: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            start: LightState::On,
            on_distance: 10.0,
            off_distance: 25.0,
            disable_timer: 1.0,
            max_flicker_wait: 1.0,
        }
    }
}

impl LightConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = from_json("light", json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Checker::new("light")
            .non_negative(self.on_distance, "on_distance")
            .ensure(
                self.on_distance < self.off_distance,
                "off_distance",
                "must be greater than on_distance",
            )
            .positive(self.disable_timer, "disable_timer")
            .non_negative(self.max_flicker_wait, "max_flicker_wait")
            .finish()
    }

    /// State the hysteresis bands assign to a player at `distance`.
    pub fn band_for(&self, distance: f32) -> LightState {
        Bands::from(self).classify(distance)
    }
}

/// The lamp and its random source.
#[derive(Clone, Debug)]
pub struct LightBody {
    pub transform: Transform,
    lit: bool,
    rng: StdRng,
}

impl LightBody {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            lit: false,
            rng: StdRng::from_entropy(),
        }
    }

    /// A body whose flicker timing is reproducible.
    pub fn with_seed(transform: Transform, seed: u64) -> Self {
        Self {
            transform,
            lit: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Body for LightBody {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn reset(&mut self, snapshot: &InitSnapshot) {
        self.transform = snapshot.transform();
        self.lit = true;
    }
}

impl Lamp for LightBody {
    fn is_lit(&self) -> bool {
        self.lit
    }

    fn set_lit(&mut self, lit: bool) {
        self.lit = lit;
    }
}

#[derive(Clone, Copy, Debug)]
struct Bands {
    on: f32,
    off: f32,
}

impl From<&LightConfig> for Bands {
    fn from(config: &LightConfig) -> Self {
        Self {
            on: config.on_distance,
            off: config.off_distance,
        }
    }
}

impl Bands {
    fn classify(&self, distance: f32) -> LightState {
        if distance <= self.on {
            LightState::On
        } else if distance >= self.off {
            LightState::Off
        } else {
            LightState::Flicker
        }
    }

    /// The band the player is in, if it differs from `current`.
    fn leave(&self, current: LightState, cx: &TaskContext<'_, LightBody>) -> Option<LightState> {
        let distance = cx.world.distance_to(PLAYER, cx.body.position())?;
        let band = self.classify(distance);
        (band != current).then_some(band)
    }
}

/// ON or OFF under hysteresis.
struct SteadyTask {
    state: LightState,
    bands: Bands,
}

impl StateTask<LightBody> for SteadyTask {
    fn step(&mut self, cx: &mut TaskContext<'_, LightBody>) -> Step {
        cx.body.set_lit(self.state == LightState::On);
        match self.bands.leave(self.state, cx) {
            Some(band) => Step::to(band),
            None => Step::Continue,
        }
    }
}

struct FlickerTask {
    bands: Bands,
    max_wait: f32,
    elapsed: f32,
    next_toggle: f32,
}

impl FlickerTask {
    fn new(bands: Bands, max_wait: f32) -> Self {
        Self {
            bands,
            max_wait,
            elapsed: 0.0,
            next_toggle: 0.0,
        }
    }
}

impl StateTask<LightBody> for FlickerTask {
    fn step(&mut self, cx: &mut TaskContext<'_, LightBody>) -> Step {
        if let Some(band) = self.bands.leave(LightState::Flicker, cx) {
            return Step::to(band);
        }

        self.elapsed += cx.delta;
        if self.elapsed >= self.next_toggle {
            let lit = cx.body.is_lit();
            cx.body.set_lit(!lit);
            let wait = cx.body.rng.gen_range(0.0..=self.max_wait);
            self.next_toggle = self.elapsed + wait;
        }
        Step::Continue
    }
}

/// TURN_ON / TURN_OFF: lamp held regardless of distance.
struct ForcedTask {
    lit: bool,
}

impl StateTask<LightBody> for ForcedTask {
    fn step(&mut self, cx: &mut TaskContext<'_, LightBody>) -> Step {
        cx.body.set_lit(self.lit);
        Step::Continue
    }
}

struct DisabledTask {
    period: f32,
    waited: f32,
}

impl StateTask<LightBody> for DisabledTask {
    fn step(&mut self, cx: &mut TaskContext<'_, LightBody>) -> Step {
        cx.body.set_lit(false);
        self.waited += cx.delta;
        if self.waited >= self.period {
            self.waited = 0.0;
            debug!(tick = cx.tick, "light disabled; ignoring stimuli");
        }
        Step::Continue
    }
}

/// A light driven by the shared engine.
pub struct Light {
    machine: Machine<LightBody>,
    body: LightBody,
    config: LightConfig,
}

impl Light {
    /// Build the light and switch the lamp on.
    pub fn new(config: LightConfig, mut body: LightBody) -> Result<Self, BehaviorError> {
        config.validate()?;
        body.set_lit(true);
        let machine = Self::descriptor(&config).build(&body)?;
        Ok(Self {
            machine,
            body,
            config,
        })
    }

    pub fn descriptor(config: &LightConfig) -> MachineBuilder<LightBody> {
        use LightState::*;

        let bands = Bands::from(config);
        let max_wait = config.max_flicker_wait;
        let period = config.disable_timer;

        MachineBuilder::new()
            .name("light")
            .state(On, move |_| SteadyTask { state: On, bands })
            .state(Off, move |_| SteadyTask { state: Off, bands })
            .state(Flicker, move |_| FlickerTask::new(bands, max_wait))
            .state(TurnOn, |_| ForcedTask { lit: true })
            .state(TurnOff, |_| ForcedTask { lit: false })
            .state(Disable, move |_| DisabledTask {
                period,
                waited: 0.0,
            })
            .declare_edge(On, [Off, Flicker, TurnOff, Disable])
            .declare_edge(Off, [On, Flicker, TurnOn, Disable])
            .declare_edge(Flicker, [On, Off, TurnOn, TurnOff, Disable])
            .declare_edge(TurnOn, [TurnOff, Disable])
            .declare_edge(TurnOff, [TurnOn, Disable])
            .start(config.start)
    }

    pub fn tick(&mut self, world: &dyn World, delta: f32) -> Step {
        self.machine.tick(&mut self.body, world, delta)
    }

    pub fn state(&self) -> Option<LightState> {
        LightState::from_id(self.machine.current_state())
    }

    pub fn request(&mut self, target: LightState) -> TransitionOutcome {
        self.machine.request_transition(&mut self.body, target)
    }

    /// Force the light on, or off if it is already on.
    ///
    /// Returns `None` for a disabled light.
    pub fn toggle_light(&mut self) -> Option<TransitionOutcome> {
        let state = self.state()?;
        if state.is_final() {
            return None;
        }
        match state {
            LightState::On | LightState::TurnOn => Some(self.request(LightState::TurnOff)),
            _ => Some(self.request(LightState::TurnOn)),
        }
    }

    /// Disable the light for good.
    pub fn disable_light(&mut self) -> Option<TransitionOutcome> {
        match self.state()? {
            LightState::Disable => None,
            _ => Some(self.request(LightState::Disable)),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.body.is_lit()
    }

    pub fn machine(&self) -> &Machine<LightBody> {
        &self.machine
    }

    pub fn body(&self) -> &LightBody {
        &self.body
    }

    pub fn config(&self) -> &LightConfig {
        &self.config
    }
}
