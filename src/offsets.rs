//! Mesh offsets from the simulated chain's sag.

use crate::chain::PhysicsState;
use crate::float::Float;
use crate::vec::Vec3;

/// Refresh `state.offsets` with each segment's displacement from its spot
/// on the straight line between `start` and `end`, scaled by stiffness.
///
/// Segment `i` of `n` is compared against `lerp(start, end, i / (n - 1))`.
/// Chains with fewer than two segments keep their offsets.
pub fn compute_offsets<F: Float>(state: &mut PhysicsState<F>, start: Vec3<F>, end: Vec3<F>) {
    let n = state.segments.len();
    if n < 2 {
        return;
    }
    let last = F::from_usize(n - 1);
    let stiffness = state.settings.stiffness;
    for (i, (offset, segment)) in state.offsets.iter_mut().zip(state.segments.iter()).enumerate() {
        let ideal = start.lerp(end, F::from_usize(i) / last);
        *offset = (segment.pos - ideal).scale(stiffness);
    }
}
