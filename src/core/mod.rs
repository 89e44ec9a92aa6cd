//! Core value types of the engine.
//!
//! This module contains the pure, dependency-free pieces:
//! - State identifiers and the `State` trait for behavior enums
//! - The ease function used by time-based tasks
//! - Spatial values and the initial snapshot recovery restores
//! - Proximity guards for stimulus entry points
//! - Bounded transition history

mod ease;
mod guard;
mod history;
mod snapshot;
mod space;
mod state;

pub use ease::{ease, is_valid_ease_factor, EASE_FACTOR_RANGE};
pub use guard::ProximityGuard;
pub use history::{StateHistory, StateTransition, TransitionKind, DEFAULT_HISTORY_CAPACITY};
pub use snapshot::InitSnapshot;
pub use space::{Quat, Transform, Vec3};
pub use state::{State, StateId};
