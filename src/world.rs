//! Capabilities the engine consumes from the host scene.
//!
//! Rendering, physics and input live outside this crate. Behaviors see
//! them only through these traits: [`World`] answers queries about
//! tracked targets, [`Body`] exposes the owning entity's transform and
//! reset hook, and [`Lamp`] / [`Actuator`] are the actuation hooks.

use crate::core::{InitSnapshot, Transform, Vec3};

/// Index of the primary actor in a behavior's tracked targets.
pub const PLAYER: usize = 0;

/// Result of a ray query against the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    /// Layer mask a target at the hit point accepts projectiles from;
    /// zero when the hit object is not a target.
    pub target_mask: u32,
}

impl RayHit {
    /// Check whether the hit object accepts projectiles on `layer`.
    pub fn accepts(&self, layer: u32) -> bool {
        layer < 32 && self.target_mask & (1 << layer) != 0
    }
}

/// Read-only queries against the scene for one tick.
pub trait World {
    /// Position of the tracked target at `index`, if it exists.
    fn target_position(&self, index: usize) -> Option<Vec3>;

    /// Facing direction of the tracked target at `index`.
    fn target_forward(&self, _index: usize) -> Option<Vec3> {
        None
    }

    /// Cast a ray along target `from`'s facing direction, limited to
    /// `range` and to objects on `layer`.
    fn raycast(&self, _from: usize, _range: f32, _layer: u32) -> Option<RayHit> {
        None
    }

    /// Distance from `point` to the tracked target at `index`.
    fn distance_to(&self, index: usize, point: Vec3) -> Option<f32> {
        self.target_position(index).map(|p| p.distance(point))
    }
}

/// The entity a machine drives.
pub trait Body {
    fn transform(&self) -> Transform;

    fn set_transform(&mut self, transform: Transform);

    fn position(&self) -> Vec3 {
        self.transform().position
    }

    fn set_position(&mut self, position: Vec3) {
        let mut transform = self.transform();
        transform.position = position;
        self.set_transform(transform);
    }

    /// Restore the entity to its snapshot. Called by recovery.
    fn reset(&mut self, snapshot: &InitSnapshot) {
        self.set_transform(snapshot.transform());
    }
}

/// Enable/disable actuation for light sources.
pub trait Lamp {
    fn is_lit(&self) -> bool;

    fn set_lit(&mut self, lit: bool);
}

/// Directional impulse actuation for physically simulated bodies.
pub trait Actuator {
    fn apply_impulse(&mut self, impulse: Vec3);
}

/// A fixed set of tracked targets with scripted ray results.
///
/// Useful for hosts without a physics backend and for tests.
#[derive(Clone, Debug, Default)]
pub struct Targets {
    transforms: Vec<Transform>,
    forwards: Vec<Vec3>,
    rays: Vec<(u32, RayHit)>,
}

impl Targets {
    pub fn new(positions: impl IntoIterator<Item = Vec3>) -> Self {
        let transforms: Vec<Transform> = positions.into_iter().map(Transform::at).collect();
        let forwards = vec![Vec3::FORWARD; transforms.len()];
        Self {
            transforms,
            forwards,
            rays: Vec::new(),
        }
    }

    /// Move target `index`, growing the list if needed.
    pub fn set_position(&mut self, index: usize, position: Vec3) {
        if index >= self.transforms.len() {
            self.transforms.resize(index + 1, Transform::default());
            self.forwards.resize(index + 1, Vec3::FORWARD);
        }
        self.transforms[index].position = position;
    }

    pub fn set_forward(&mut self, index: usize, forward: Vec3) {
        if let Some(slot) = self.forwards.get_mut(index) {
            *slot = forward;
        }
    }

    /// Script the result of rays cast on `layer`; `None` clears it.
    pub fn set_ray_hit(&mut self, layer: u32, hit: Option<RayHit>) {
        self.rays.retain(|(l, _)| *l != layer);
        if let Some(hit) = hit {
            self.rays.push((layer, hit));
        }
    }
}

impl World for Targets {
    fn target_position(&self, index: usize) -> Option<Vec3> {
        self.transforms.get(index).map(|t| t.position)
    }

    fn target_forward(&self, index: usize) -> Option<Vec3> {
        self.forwards.get(index).copied()
    }

    fn raycast(&self, from: usize, range: f32, layer: u32) -> Option<RayHit> {
        self.transforms.get(from)?;
        self.rays
            .iter()
            .find(|(l, hit)| *l == layer && hit.distance <= range)
            .map(|(_, hit)| *hit)
    }
}
