//! Scalar trait shared by the physics and mesh code, over `f32` and `f64`.

use core::cmp::PartialOrd;
use core::ops::{Add, Sub, Mul, Div, Neg};

/// Trait abstracting floating-point operations needed by the rope kernel.
///
/// Implemented for `f32` and `f64`. The `Send + Sync + 'static` bounds let
/// build requests carrying these values cross onto worker threads.
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Default
    + Send
    + Sync
    + 'static
    + core::fmt::Debug
{
    fn zero() -> Self;
    fn one() -> Self;
    fn half() -> Self;
    fn two() -> Self;
    fn pi() -> Self;
    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn abs(self) -> Self;
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
    /// Constants and config literals go through here.
    fn from_f32(v: f32) -> Self;
    /// Convert to f64, for index math and logging.
    fn to_f64(self) -> f64;
    /// Floating-point remainder with the sign of `self`.
    fn fmod(self, modulus: Self) -> Self;
    /// Whether the value is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Convert from an index or count.
    fn from_usize(v: usize) -> Self {
        Self::from_f32(v as f32)
    }

    /// Clamp self to [min, max].
    fn clamp(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }

    /// Clamp self to [0, 1].
    fn clamp01(self) -> Self {
        self.clamp(Self::zero(), Self::one())
    }

    fn lerp(self, other: Self, t: Self) -> Self {
        self + (other - self) * t
    }

    /// Degrees to radians.
    fn to_radians(self) -> Self {
        self * Self::pi() / Self::from_f32(180.0)
    }

    fn is_near_zero(self, epsilon: Self) -> bool {
        self.abs() < epsilon
    }

    /// Truncate a non-negative value to an index. Negative and non-finite
    /// values map to zero.
    fn to_index(self) -> usize {
        let v = self.to_f64();
        if v.is_finite() && v > 0.0 { v as usize } else { 0 }
    }
}

macro_rules! impl_float {
    ($t:ident, $sqrt:path, $sin:path, $cos:path, $fabs:path, $fmod:path) => {
        impl Float for $t {
            fn zero() -> Self { 0.0 }
            fn one() -> Self { 1.0 }
            fn half() -> Self { 0.5 }
            fn two() -> Self { 2.0 }
            fn pi() -> Self { core::$t::consts::PI }
            fn sqrt(self) -> Self { $sqrt(self) }
            fn sin(self) -> Self { $sin(self) }
            fn cos(self) -> Self { $cos(self) }
            fn abs(self) -> Self { $fabs(self) }
            fn min(self, other: Self) -> Self { if self < other { self } else { other } }
            fn max(self, other: Self) -> Self { if self > other { self } else { other } }
            fn from_f32(v: f32) -> Self { v as $t }
            fn to_f64(self) -> f64 { self as f64 }
            fn fmod(self, modulus: Self) -> Self { $fmod(self, modulus) }
            fn is_finite(self) -> bool { $t::is_finite(self) }
        }
    };
}

impl_float!(f32, libm::sqrtf, libm::sinf, libm::cosf, libm::fabsf, libm::fmodf);
impl_float!(f64, libm::sqrt, libm::sin, libm::cos, libm::fabs, libm::fmod);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmod_wraps_degrees() {
        assert!((Float::fmod(450.0f32, 360.0) - 90.0).abs() < 1e-4);
        assert!((Float::fmod(180.0f64, 360.0) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn to_index_truncates() {
        assert_eq!(Float::to_index(19.99f32), 19);
        assert_eq!(Float::to_index(-3.0f32), 0);
        assert_eq!(Float::to_index(f32::NAN), 0);
    }

    #[test]
    fn clamp01_bounds() {
        assert_eq!(Float::clamp01(1.5f32), 1.0);
        assert_eq!(Float::clamp01(-0.5f32), 0.0);
        assert_eq!(Float::clamp01(0.25f32), 0.25);
    }
}
