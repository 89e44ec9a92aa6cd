//! Guard predicates for stimulus entry points.
//!
//! Stimuli such as "use the key on the door" only fire when a tracked
//! target is close enough. Guards encapsulate that pre-condition as a
//! pure check against the world, evaluated before a transition is
//! requested.

use super::space::Vec3;
use crate::world::World;

/// Pure range check between a tracked target and a point.
///
/// # Example
///
/// ```rust
/// use smartstate::core::{ProximityGuard, Vec3};
/// use smartstate::world::{Targets, PLAYER};
///
/// let world = Targets::new([Vec3::new(0.0, 0.0, 3.0)]);
/// let near = ProximityGuard::new(PLAYER, 5.0);
/// let far = ProximityGuard::new(PLAYER, 1.0);
///
/// assert!(near.check(&world, Vec3::ZERO));
/// assert!(!far.check(&world, Vec3::ZERO));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityGuard {
    target: usize,
    radius: f32,
}

impl ProximityGuard {
    pub fn new(target: usize, radius: f32) -> Self {
        Self { target, radius }
    }

    /// Passes when the target exists and is within `radius` of `origin`.
    pub fn check(&self, world: &dyn World, origin: Vec3) -> bool {
        world
            .distance_to(self.target, origin)
            .is_some_and(|d| d <= self.radius)
    }
}
