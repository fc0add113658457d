//! Hooks into [`simulate`](crate::solver::simulate), for convergence checks
//! and debug drawing.

use crate::float::Float;
use crate::segment::PhysicsSegment;

/// Receives the phases of one rope physics step. Every hook defaults to
/// doing nothing.
pub trait StepObserver<F: Float> {
    /// Every segment has taken its Verlet step and been floor-clamped.
    fn on_integrate(&mut self) {}

    /// Relaxation pass `iteration` finished; both ends are pinned again.
    fn on_constraint_iteration(&mut self, _iteration: usize, _segments: &[PhysicsSegment<F>]) {}

    fn on_step_complete(&mut self) {}
}

/// Observer for callers that don't watch the solver.
pub struct NoOpStepObserver;

impl<F: Float> StepObserver<F> for NoOpStepObserver {}
