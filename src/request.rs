//! Mesh build requests and the pipeline a worker runs for each one.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::chain::PhysicsState;
use crate::float::Float;
use crate::mesh::{self, MeshBuffers, MeshParams};
use crate::observer::NoOpStepObserver;

/// A rope's physics chain, shared with whichever worker is building for it.
pub type SharedPhysics<F> = Arc<Mutex<PhysicsState<F>>>;

/// Completion callback. Runs on a worker thread.
pub type BuildCallback<F> = Box<dyn FnOnce(MeshBuffers<F>) + Send + 'static>;

/// Marks a rope as having a build outstanding; clears the mark when the
/// request is processed or dropped unprocessed.
#[derive(Debug)]
pub struct FlightGuard {
    flag: Arc<AtomicBool>,
}

impl FlightGuard {
    /// Claim `flag`. Returns `None` if a build is already in flight.
    pub fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard { flag: Arc::clone(flag) })
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Snapshot of everything one mesh build needs. Consumed exactly once.
pub struct MeshBuildRequest<F: Float> {
    pub params: MeshParams<F>,
    pub physics: SharedPhysics<F>,
    callback: BuildCallback<F>,
    flight: Option<FlightGuard>,
}

impl<F: Float> MeshBuildRequest<F> {
    pub fn new<C>(params: MeshParams<F>, physics: SharedPhysics<F>, callback: C) -> Self
    where
        C: FnOnce(MeshBuffers<F>) + Send + 'static,
    {
        MeshBuildRequest {
            params,
            physics,
            callback: Box::new(callback),
            flight: None,
        }
    }

    /// Attach a flight guard, released once this request is done with.
    pub fn with_flight(mut self, guard: FlightGuard) -> Self {
        self.flight = Some(guard);
        self
    }

    /// Step the physics, rebuild the mesh, and hand it to the callback.
    ///
    /// The chain is clamped to `params.min_height`, the same floor the mesh
    /// centerline uses. The physics lock is held for the simulation and
    /// released before the mesh is generated. The flight guard is released
    /// after the callback returns.
    pub fn process(self, dt: F) {
        let MeshBuildRequest { params, physics, callback, flight } = self;
        let offsets = {
            let mut state = physics.lock();
            state.step_above(
                params.start.position,
                params.end.position,
                dt,
                params.min_height,
                &mut NoOpStepObserver,
            );
            state.offsets().to_vec()
        };
        let buffers = mesh::generate(&params, &offsets);
        callback(buffers);
        drop(flight);
    }
}

impl<F: Float> fmt::Debug for MeshBuildRequest<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshBuildRequest")
            .field("params", &self.params)
            .field("in_flight_guard", &self.flight.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::config::PhysicsSettings;
    use crate::vec::Vec3;
    use std::sync::mpsc;

    fn params() -> MeshParams<f32> {
        MeshParams {
            start: Anchor::at(Vec3::new(0.0, 5.0, 0.0)),
            end: Anchor::at(Vec3::new(6.0, 5.0, 0.0)),
            rope_radius: 0.2,
            capsule_radius: 1.0,
            rope_resolution: 6,
            spherical_resolution: 4,
            linear_resolution: 12,
            min_height: 0.2,
        }
    }

    #[test]
    fn process_invokes_callback_and_steps_physics() {
        let p = params();
        let physics = Arc::new(Mutex::new(PhysicsState::new(
            p.start.position,
            p.end.position,
            10,
            PhysicsSettings::new(),
        )));
        let (tx, rx) = mpsc::channel();
        MeshBuildRequest::new(p, Arc::clone(&physics), move |m| tx.send(m).unwrap()).process(0.02);

        let mesh = rx.recv().unwrap();
        assert_eq!(mesh.vertex_count(), p.vertex_count());
        assert_eq!(mesh.indices.len(), p.index_count());
        // Gravity pulled the middle of the chain down.
        assert!(physics.lock().segments()[5].pos.y < 5.0);
    }

    #[test]
    fn process_clamps_chain_to_mesh_floor() {
        let mut p = params();
        p.start.position.y = 0.4;
        p.end.position.y = 0.4;
        p.min_height = 0.4;
        let settings = PhysicsSettings::new().with_gravity(Vec3::new(0.0, -200.0, 0.0));
        let physics = Arc::new(Mutex::new(PhysicsState::new(p.start.position, p.end.position, 10, settings)));
        MeshBuildRequest::new(p, Arc::clone(&physics), |_| {}).process(0.02);

        let state = physics.lock();
        assert_eq!(state.settings.floor_height, 0.0);
        assert!(state.segments().iter().all(|s| (s.pos.y - 0.4).abs() < 1e-4));
    }

    #[test]
    fn flight_guard_is_exclusive_and_released() {
        let flag = Arc::new(AtomicBool::new(false));
        let guard = FlightGuard::acquire(&flag).unwrap();
        assert!(FlightGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(FlightGuard::acquire(&flag).is_some());
    }

    #[test]
    fn dropped_request_releases_flight() {
        let flag = Arc::new(AtomicBool::new(false));
        let physics = Arc::new(Mutex::new(PhysicsState::new(
            Vec3::zero(),
            Vec3::new(1.0f32, 0.0, 0.0),
            4,
            PhysicsSettings::new(),
        )));
        let request = MeshBuildRequest::new(params(), physics, |_| {})
            .with_flight(FlightGuard::acquire(&flag).unwrap());
        assert!(flag.load(Ordering::Acquire));
        drop(request);
        assert!(!flag.load(Ordering::Acquire));
    }
}
