//! Concrete interactive objects built on the shared engine.
//!
//! Each behavior is a descriptor (state enum, task factories, edges, hop
//! table) plus a body implementing the capability traits, plus the
//! stimulus entry points that turn outside events into transition
//! requests after checking their guard conditions.

pub mod config;
pub mod door;
pub mod light;
pub mod mover;
pub mod player;
pub mod target;
pub mod throwable;

pub use config::ConfigError;
pub use door::{Door, DoorBody, DoorConfig, DoorState};
pub use light::{Light, LightBody, LightConfig, LightState};
pub use mover::{Mover, MoverBody, MoverConfig, MoverState};
pub use player::{Player, PlayerBody, PlayerConfig, PlayerState};
pub use target::{Target, TargetBody, TargetConfig, TargetState};
pub use throwable::{Throwable, ThrowableBody, ThrowableConfig, ThrowableState};

use crate::builder::BuildError;
use thiserror::Error;

/// Errors constructing a behavior.
#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),
}
