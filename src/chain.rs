//! The rope's physics chain: point masses, mesh offsets, and settings.

use crate::config::PhysicsSettings;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::segment::PhysicsSegment;
use crate::vec::Vec3;
use crate::{offsets, solver};

/// Fixed-length chain of point masses approximating a rope's centerline,
/// plus the offsets derived from it for the mesh.
///
/// The segment and offset arrays never change length after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsState<F: Float> {
    pub(crate) segments: Vec<PhysicsSegment<F>>,
    pub(crate) offsets: Vec<Vec3<F>>,
    pub settings: PhysicsSettings<F>,
}

impl<F: Float> PhysicsState<F> {
    /// Lay `resolution` segments out evenly on the straight line from
    /// `start` to `end`, at rest, with zero offsets.
    pub fn new(start: Vec3<F>, end: Vec3<F>, resolution: usize, settings: PhysicsSettings<F>) -> Self {
        let last = resolution.saturating_sub(1).max(1);
        let segments = (0..resolution)
            .map(|i| PhysicsSegment::new(start.lerp(end, F::from_usize(i) / F::from_usize(last))))
            .collect();
        PhysicsState {
            segments,
            offsets: vec![Vec3::zero(); resolution],
            settings,
        }
    }

    /// Advance the chain one fixed step and refresh the offsets.
    /// Inactive chains are left untouched.
    pub fn step<O: StepObserver<F>>(&mut self, start: Vec3<F>, end: Vec3<F>, dt: F, observer: &mut O) {
        let floor = self.settings.floor_height;
        self.step_above(start, end, dt, floor, observer);
    }

    /// [`step`](Self::step) with segments clamped to `floor` rather than the
    /// configured floor height.
    pub fn step_above<O: StepObserver<F>>(
        &mut self,
        start: Vec3<F>,
        end: Vec3<F>,
        dt: F,
        floor: F,
        observer: &mut O,
    ) {
        if !self.settings.active {
            return;
        }
        solver::simulate_above(self, start, end, dt, floor, observer);
        offsets::compute_offsets(self, start, end);
    }

    /// Push the interior segments by `force`, strongest at `percent` of the
    /// way along the chain and fading linearly to nothing half a chain away.
    ///
    /// Chains with fewer than three segments have no interior and are
    /// left alone.
    pub fn shake(&mut self, force: Vec3<F>, percent: F) {
        let n = self.segments.len();
        if n < 3 {
            return;
        }
        let falloff = F::one() / (F::from_usize(n - 1) * F::half());
        let peak = (percent * F::from_usize(n)).to_index().clamp(1, n - 2);
        for i in 1..n - 1 {
            let distance = F::from_usize(i.abs_diff(peak));
            let weight = F::one() - (falloff * distance).clamp01();
            self.segments[i].pos += force.scale(weight);
        }
    }

    pub fn segments(&self) -> &[PhysicsSegment<F>] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut [PhysicsSegment<F>] {
        &mut self.segments
    }

    pub fn offsets(&self) -> &[Vec3<F>] {
        &self.offsets
    }

    pub fn positions(&self) -> Vec<Vec3<F>> {
        self.segments.iter().map(|s| s.pos).collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
