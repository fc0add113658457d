//! Per-rope driver state: turns anchor poses into build requests once per
//! tick and hands finished meshes back through a dirty flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::anchor::Anchor;
use crate::chain::PhysicsState;
use crate::config::RopeConfig;
use crate::error::RopeResult;
use crate::float::Float;
use crate::mesh::{MeshBuffers, MeshParams};
use crate::request::{FlightGuard, MeshBuildRequest, SharedPhysics};
use crate::scheduler::{Submission, WorkScheduler};
use crate::vec::Vec3;

/// What [`RopeInstance::tick`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A build request was queued.
    Submitted(Submission),
    /// Anchors have been still for longer than the sleep time.
    Sleeping,
    /// The previous request has not finished yet.
    InFlight,
}

/// Latest finished mesh plus a flag saying it has not been picked up.
///
/// Written by workers, read by the host.
#[derive(Debug)]
pub struct MeshSlot<F: Float> {
    latest: Mutex<Option<MeshBuffers<F>>>,
    dirty: AtomicBool,
}

impl<F: Float> MeshSlot<F> {
    pub fn new() -> Self {
        MeshSlot {
            latest: Mutex::new(None),
            dirty: AtomicBool::new(false),
        }
    }

    /// Replace the stored mesh and mark it changed.
    pub fn publish(&self, buffers: MeshBuffers<F>) {
        *self.latest.lock() = Some(buffers);
        self.dirty.store(true, Ordering::Release);
    }

    /// Take the newest mesh if it changed since the last take.
    pub fn take(&self) -> Option<MeshBuffers<F>> {
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return None;
        }
        self.latest.lock().take()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }
}

impl<F: Float> Default for MeshSlot<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// One rope as seen by the fixed-tick driver.
///
/// Owns the physics chain and enforces a single outstanding build: a new
/// request is only made once the previous one has been processed or
/// evicted.
pub struct RopeInstance<F: Float> {
    config: RopeConfig<F>,
    physics: SharedPhysics<F>,
    slot: Arc<MeshSlot<F>>,
    in_flight: Arc<AtomicBool>,
    last_start: Vec3<F>,
    last_end: Vec3<F>,
    last_move: F,
    force_next: bool,
    sleeping: bool,
}

impl<F: Float> RopeInstance<F> {
    /// Validate `config` and lay the physics chain out straight between the
    /// two anchors. The first tick always submits.
    pub fn new(config: RopeConfig<F>, start: Vec3<F>, end: Vec3<F>) -> RopeResult<Self> {
        config.validate()?;
        let physics = PhysicsState::new(start, end, config.physics_resolution, config.physics);
        Ok(RopeInstance {
            config,
            physics: Arc::new(Mutex::new(physics)),
            slot: Arc::new(MeshSlot::new()),
            in_flight: Arc::new(AtomicBool::new(false)),
            last_start: start,
            last_end: end,
            last_move: -config.time_offset,
            force_next: true,
            sleeping: false,
        })
    }

    /// Sample the anchors at time `now` (seconds) and queue a rebuild if the
    /// rope is awake and idle.
    pub fn tick(&mut self, start: Anchor<F>, end: Anchor<F>, now: F, scheduler: &WorkScheduler<F>) -> TickOutcome {
        let epsilon = F::from_f32(1e-5);
        if !start.position.approx_eq(self.last_start, epsilon) || !end.position.approx_eq(self.last_end, epsilon) {
            self.last_start = start.position;
            self.last_end = end.position;
            self.last_move = now;
        }

        let asleep = now - self.last_move >= self.config.sleep_time;
        if asleep && !self.force_next {
            if !self.sleeping {
                debug!(idle_for = (now - self.last_move).to_f64(), "rope going to sleep");
                self.sleeping = true;
            }
            return TickOutcome::Sleeping;
        }
        if self.sleeping {
            debug!("rope waking up");
            self.sleeping = false;
        }

        let Some(guard) = FlightGuard::acquire(&self.in_flight) else {
            return TickOutcome::InFlight;
        };
        self.force_next = false;

        // Both ends share the orientation looking from start to end.
        let (start, end) = if self.config.align_anchors {
            let aligned = Anchor::facing(start.position, end.position, Vec3::up());
            (aligned, Anchor { position: end.position, ..aligned })
        } else {
            (start, end)
        };

        let params = self.mesh_params(start, end);
        let slot = Arc::clone(&self.slot);
        let request = MeshBuildRequest::new(params, Arc::clone(&self.physics), move |buffers| slot.publish(buffers))
            .with_flight(guard);
        TickOutcome::Submitted(scheduler.submit(request))
    }

    /// Geometry for a build with the given anchors, with the stretch applied
    /// to the radii.
    pub fn mesh_params(&self, start: Anchor<F>, end: Anchor<F>) -> MeshParams<F> {
        let c = &self.config;
        let distance = start.position.distance(end.position);
        let rope_radius = c.stretched_radius(distance);
        MeshParams {
            start,
            end,
            rope_radius,
            capsule_radius: (c.capsule_radius + rope_radius).max(F::zero()),
            rope_resolution: c.rope_resolution,
            spherical_resolution: c.spherical_resolution,
            linear_resolution: c.linear_resolution(distance),
            min_height: c.physics.floor_height + rope_radius,
        }
    }

    /// Take the newest finished mesh, once.
    pub fn take_mesh(&self) -> Option<MeshBuffers<F>> {
        self.slot.take()
    }

    /// Jolt the rope with `force`, centered `percent` of the way along it,
    /// and keep it awake from `now`.
    pub fn shake(&mut self, force: Vec3<F>, percent: F, now: F) {
        self.last_move = now;
        self.physics.lock().shake(force, percent);
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn config(&self) -> &RopeConfig<F> {
        &self.config
    }

    /// Handle to the physics chain. Locking it while a build is in flight
    /// blocks that build's worker.
    pub fn physics(&self) -> &SharedPhysics<F> {
        &self.physics
    }

    pub fn mesh_slot(&self) -> &Arc<MeshSlot<F>> {
        &self.slot
    }
}
