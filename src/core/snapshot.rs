//! Snapshot of an entity taken when its machine is built.

use super::space::{Quat, Transform, Vec3};
use super::state::StateId;
use serde::{Deserialize, Serialize};

/// Initial configuration of an entity: where it stood and which state
/// its machine started in.
///
/// Captured once at machine construction and never mutated afterwards.
/// Only recovery reads it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InitSnapshot {
    transform: Transform,
    start_state: StateId,
}

impl InitSnapshot {
    pub fn capture(transform: Transform, start_state: StateId) -> Self {
        Self {
            transform,
            start_state,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn start_position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn start_orientation(&self) -> Quat {
        self.transform.rotation
    }

    pub fn start_state(&self) -> StateId {
        self.start_state
    }
}
