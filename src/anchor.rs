//! Rope endpoint poses.

use crate::float::Float;
use crate::vec::Vec3;

/// One endpoint pose of a rope.
///
/// `up` is the axis the capsule cap fans around, `right` is the direction
/// the fan starts from. Neither is required to be unit length, but the
/// mesh only looks as configured when they are.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor<F: Float> {
    pub position: Vec3<F>,
    pub up: Vec3<F>,
    pub right: Vec3<F>,
}

impl<F: Float> Anchor<F> {
    pub fn new(position: Vec3<F>, up: Vec3<F>, right: Vec3<F>) -> Self {
        Anchor { position, up, right }
    }

    /// Anchor at `position` with world up `(0, 1, 0)` and right `(0, 0, 1)`.
    pub fn at(position: Vec3<F>) -> Self {
        Anchor {
            position,
            up: Vec3::up(),
            right: Vec3::new(F::zero(), F::zero(), F::one()),
        }
    }

    /// Anchor at `position` oriented to look at `target`, keeping `up` as
    /// close to `world_up` as the look direction allows.
    ///
    /// When `target` coincides with `position`, or the look direction is
    /// parallel to `world_up`, the plain [`Anchor::at`] orientation is used.
    pub fn facing(position: Vec3<F>, target: Vec3<F>, world_up: Vec3<F>) -> Self {
        let forward = (target - position).normalize();
        let right = world_up.cross(forward).normalize();
        if forward == Vec3::zero() || right == Vec3::zero() {
            return Self::at(position);
        }
        let up = forward.cross(right);
        Anchor { position, up, right }
    }
}
