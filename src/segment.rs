//! Rope point masses with implicit Verlet velocity.

use crate::float::Float;
use crate::vec::Vec3;

/// One point mass of the rope chain.
///
/// Velocity is implicit: `pos - prev_pos`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicsSegment<F: Float> {
    pub pos: Vec3<F>,
    pub prev_pos: Vec3<F>,
}

impl<F: Float> PhysicsSegment<F> {
    /// A segment at rest at `pos`.
    pub fn new(pos: Vec3<F>) -> Self {
        PhysicsSegment { pos, prev_pos: pos }
    }

    /// Advance one Verlet step under constant `gravity`, then keep the
    /// height at or above `floor`.
    ///
    /// Gravity enters as `gravity * dt` (not `dt^2`), so the configured
    /// gravity reads as a per-step velocity gain at the fixed step.
    pub fn integrate(&mut self, gravity: Vec3<F>, dt: F, floor: F) {
        let velocity = self.velocity_raw();
        self.prev_pos = self.pos;
        self.pos = (self.pos + gravity.scale(dt) + velocity).with_min_y(floor);
    }

    /// Teleport to `pos` and drop all velocity.
    pub fn pin_to(&mut self, pos: Vec3<F>) {
        *self = Self::new(pos);
    }

    pub fn velocity_raw(&self) -> Vec3<F> {
        self.pos - self.prev_pos
    }
}
