//! Verlet integration and iterative relaxation for the rope chain.

use crate::chain::PhysicsState;
use crate::constraint::{LinkConstraint, PinConstraint};
use crate::float::Float;
use crate::observer::StepObserver;
use crate::vec::Vec3;

/// Advance `state` by one fixed step `dt` with its ends held at `start`
/// and `end`, clamped to the configured floor height.
///
/// Each segment takes a Verlet step under the configured gravity and is
/// kept above the floor. Then, `iterations` times: pin both ends, relax
/// every adjacent pair towards `distance(start, end) / (n - 1)` in order,
/// and pin both ends again. Pins override whatever the relaxation did.
///
/// Chains with fewer than two segments are not simulated.
pub fn simulate<F: Float, O: StepObserver<F>>(
    state: &mut PhysicsState<F>,
    start: Vec3<F>,
    end: Vec3<F>,
    dt: F,
    observer: &mut O,
) {
    let floor = state.settings.floor_height;
    simulate_above(state, start, end, dt, floor, observer);
}

/// [`simulate`] with the integration clamp at `floor` instead of the
/// configured floor height. Mesh builds pass the floor raised by the
/// current rope radius so the tube surface rests on the ground.
pub fn simulate_above<F: Float, O: StepObserver<F>>(
    state: &mut PhysicsState<F>,
    start: Vec3<F>,
    end: Vec3<F>,
    dt: F,
    floor: F,
    observer: &mut O,
) {
    let n = state.segments.len();
    if n < 2 {
        return;
    }
    let settings = state.settings;
    let rest_length = start.distance(end) / F::from_usize(n - 1);

    for s in state.segments.iter_mut() {
        s.integrate(settings.gravity, dt, floor);
    }
    observer.on_integrate();

    let pins = [PinConstraint::new(0, start), PinConstraint::new(n - 1, end)];
    for i in 0..settings.iterations {
        for pin in &pins {
            pin.solve(&mut state.segments);
        }
        for a in 0..n - 1 {
            LinkConstraint::new(a, rest_length, a == 0).solve(&mut state.segments);
        }
        for pin in &pins {
            pin.solve(&mut state.segments);
        }
        observer.on_constraint_iteration(i, &state.segments);
    }

    observer.on_step_complete();
}

/// Largest rest-length violation over all adjacent pairs, with the rest
/// length the solver would use for these anchors.
pub fn max_link_error<F: Float>(state: &PhysicsState<F>, start: Vec3<F>, end: Vec3<F>) -> F {
    let n = state.segments.len();
    if n < 2 {
        return F::zero();
    }
    let rest_length = start.distance(end) / F::from_usize(n - 1);
    (0..n - 1)
        .map(|a| LinkConstraint::new(a, rest_length, a == 0).error(&state.segments))
        .fold(F::zero(), |acc, e| acc.max(e))
}
