//! 3D vector type for rope physics and mesh generation.

use crate::float::Float;
use core::ops::{Add, AddAssign, Sub, SubAssign, Mul, Neg};

/// 3D vector. `y` is the height axis: floor clamps act on it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Vec3<F> {
    /// Create a new 3D vector.
    pub fn new(x: F, y: F, z: F) -> Self { Vec3 { x, y, z } }

    /// Zero vector.
    pub fn zero() -> Self { Vec3 { x: F::zero(), y: F::zero(), z: F::zero() } }

    /// World up, `(0, 1, 0)`.
    pub fn up() -> Self { Vec3 { x: F::zero(), y: F::one(), z: F::zero() } }

    /// Dot product.
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// 3D cross product.
    pub fn cross(self, other: Self) -> Self {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Squared length (avoids sqrt).
    pub fn length_sq(self) -> F {
        self.dot(self)
    }

    /// Length (magnitude).
    pub fn length(self) -> F {
        self.length_sq().sqrt()
    }

    /// Normalize to unit length. Returns zero vector if length is near zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len.is_near_zero(F::from_f32(1e-10)) {
            Self::zero()
        } else {
            self.scale(F::one() / len)
        }
    }

    /// Scale all components by a scalar.
    pub fn scale(self, s: F) -> Self {
        Vec3 { x: self.x * s, y: self.y * s, z: self.z * s }
    }

    /// Distance between two points.
    pub fn distance(self, other: Self) -> F {
        (self - other).length()
    }

    /// Linear interpolation between self and other.
    pub fn lerp(self, other: Self, t: F) -> Self {
        self + (other - self).scale(t)
    }

    /// Copy of `self` with the height raised to at least `min_y`.
    pub fn with_min_y(self, min_y: F) -> Self {
        Vec3 { x: self.x, y: self.y.max(min_y), z: self.z }
    }

    /// Rotate `self` about `axis` by `degrees` (Rodrigues' formula).
    ///
    /// `axis` is normalized internally; a zero axis leaves the vector as is.
    pub fn rotate_about(self, axis: Self, degrees: F) -> Self {
        let k = axis.normalize();
        if k == Self::zero() {
            return self;
        }
        let radians = degrees.to_radians();
        let (sin, cos) = (radians.sin(), radians.cos());
        self.scale(cos) + k.cross(self).scale(sin) + k.scale(k.dot(self) * (F::one() - cos))
    }

    /// Approximate equality, component-wise within `epsilon`.
    pub fn approx_eq(self, other: Self, epsilon: F) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }

    /// Whether every component is finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl<F: Float> Add for Vec3<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Vec3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl<F: Float> AddAssign for Vec3<F> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<F: Float> Sub for Vec3<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Vec3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl<F: Float> SubAssign for Vec3<F> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<F: Float> Mul<F> for Vec3<F> {
    type Output = Self;
    fn mul(self, rhs: F) -> Self { self.scale(rhs) }
}

impl<F: Float> Neg for Vec3<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec3 { x: -self.x, y: -self.y, z: -self.z } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_length() {
        let v = Vec3::new(2.0f32, 3.0, 6.0);
        assert!((v.length() - 7.0).abs() < 1e-6);
    }

    #[test]
    fn vec3_cross() {
        let i = Vec3::new(1.0f32, 0.0, 0.0);
        let j = Vec3::new(0.0f32, 1.0, 0.0);
        let k = i.cross(j);
        assert!((k.x - 0.0).abs() < 1e-6);
        assert!((k.y - 0.0).abs() < 1e-6);
        assert!((k.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_vector() {
        let v = Vec3::<f32>::zero();
        assert_eq!(v.normalize(), Vec3::zero());
    }

    #[test]
    fn rotate_quarter_turn_about_up() {
        let right = Vec3::new(0.0f32, 0.0, 1.0);
        let r = right.rotate_about(Vec3::up(), 90.0);
        assert!(r.approx_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5), "got {:?}", r);
    }

    #[test]
    fn rotation_preserves_length() {
        let v = Vec3::new(1.0f64, 2.0, -0.5);
        let axis = Vec3::new(0.3, -1.0, 0.2);
        for step in 0..12 {
            let r = v.rotate_about(axis, 30.0 * step as f64);
            assert!((r.length() - v.length()).abs() < 1e-9);
        }
    }

    #[test]
    fn rotate_about_zero_axis_is_identity() {
        let v = Vec3::new(1.0f32, 2.0, 3.0);
        assert_eq!(v.rotate_about(Vec3::zero(), 45.0), v);
    }

    #[test]
    fn lerp_midpoint() {
        let a = Vec3::new(0.0f32, 0.0, 0.0);
        let b = Vec3::new(10.0f32, 10.0, -4.0);
        let mid = a.lerp(b, 0.5);
        assert!(mid.approx_eq(Vec3::new(5.0, 5.0, -2.0), 1e-6));
    }

    #[test]
    fn with_min_y_only_raises() {
        let v = Vec3::new(1.0f32, -2.0, 3.0);
        assert_eq!(v.with_min_y(0.5).y, 0.5);
        assert_eq!(v.with_min_y(-5.0).y, -2.0);
    }
}
