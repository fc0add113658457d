//! Configuration types for ropes, their physics, and the build scheduler.

use crate::error::{RopeError, RopeResult};
use crate::float::Float;
use crate::vec::Vec3;

/// Physics-only settings carried by a [`PhysicsState`](crate::PhysicsState).
///
/// # Builder Pattern
/// ```
/// use capsule_rope::config::PhysicsSettings;
/// use capsule_rope::vec::Vec3;
///
/// let settings: PhysicsSettings<f32> = PhysicsSettings::new()
///     .with_iterations(8)
///     .with_gravity(Vec3::new(0.0, -9.81, 0.0))
///     .with_stiffness(0.5);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicsSettings<F: Float> {
    /// Whether the chain is simulated at all. Inactive ropes mesh with
    /// whatever offsets they last computed. Default: true.
    pub active: bool,
    /// Gravity, applied as `gravity * dt` per step. Default: `(0, -1, 0)`.
    pub gravity: Vec3<F>,
    /// Lowest height a segment may reach. Default: 0.
    pub floor_height: F,
    /// Relaxation passes per step. Default: 5.
    pub iterations: usize,
    /// Scale applied to the sag when turning it into mesh offsets, in
    /// [0, 1]. Default: 0.8.
    pub stiffness: F,
}

impl<F: Float> PhysicsSettings<F> {
    pub fn new() -> Self {
        PhysicsSettings {
            active: true,
            gravity: Vec3::new(F::zero(), -F::one(), F::zero()),
            floor_height: F::zero(),
            iterations: 5,
            stiffness: F::from_f32(0.8),
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_floor_height(mut self, floor_height: F) -> Self {
        self.floor_height = floor_height;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn validate(&self) -> RopeResult<()> {
        if self.iterations == 0 {
            return Err(RopeError::invalid("iterations", "must be at least 1"));
        }
        if !(self.stiffness >= F::zero() && self.stiffness <= F::one()) {
            return Err(RopeError::invalid("stiffness", "must be in [0, 1]"));
        }
        if !self.gravity.is_finite() || !self.floor_height.is_finite() {
            return Err(RopeError::invalid("gravity", "must be finite"));
        }
        Ok(())
    }
}

impl<F: Float> Default for PhysicsSettings<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-rope parameters, fixed for the rope's lifetime.
///
/// Defaults describe a thin rope inside a 2-unit capsule that thins out
/// when pulled past 5 units.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RopeConfig<F: Float> {
    /// Tube radius at rest. Default: 0.2.
    pub rope_radius: F,
    /// Capsule cap radius, before the tube radius is added. Default: 2.
    pub capsule_radius: F,
    /// Vertices around the tube cross-section. Default: 8.
    pub rope_resolution: usize,
    /// Centerline points per capsule cap. Default: 16.
    pub spherical_resolution: usize,
    /// Distance covered by one straight-run subdivision. Default: 0.5.
    pub linear_step: F,
    /// Fraction of `rope_radius` kept however far the rope stretches.
    /// Default: 0.3.
    pub min_radius_fraction: F,
    /// Radius loss per unit of distance beyond `resting_distance`.
    /// Default: 0.1.
    pub stretchiness: F,
    /// Anchor distance up to which the rope keeps its full radius.
    /// Default: 5.
    pub resting_distance: F,
    /// Point masses in the physics chain. Default: 20.
    pub physics_resolution: usize,
    /// Seconds of anchor stillness before the rope stops rebuilding.
    /// Default: 3.
    pub sleep_time: F,
    /// Seconds subtracted from the initial motion timestamp, so freshly
    /// created ropes fall asleep sooner. Default: 3.
    pub time_offset: F,
    /// Re-orient both anchors to face each other on every tick.
    /// Default: true.
    pub align_anchors: bool,
    pub physics: PhysicsSettings<F>,
}

impl<F: Float> RopeConfig<F> {
    pub fn new() -> Self {
        RopeConfig {
            rope_radius: F::from_f32(0.2),
            capsule_radius: F::two(),
            rope_resolution: 8,
            spherical_resolution: 16,
            linear_step: F::half(),
            min_radius_fraction: F::from_f32(0.3),
            stretchiness: F::from_f32(0.1),
            resting_distance: F::from_f32(5.0),
            physics_resolution: 20,
            sleep_time: F::from_f32(3.0),
            time_offset: F::from_f32(3.0),
            align_anchors: true,
            physics: PhysicsSettings::new(),
        }
    }

    pub fn with_rope_radius(mut self, radius: F) -> Self {
        self.rope_radius = radius;
        self
    }

    pub fn with_capsule_radius(mut self, radius: F) -> Self {
        self.capsule_radius = radius;
        self
    }

    pub fn with_rope_resolution(mut self, resolution: usize) -> Self {
        self.rope_resolution = resolution;
        self
    }

    pub fn with_spherical_resolution(mut self, resolution: usize) -> Self {
        self.spherical_resolution = resolution;
        self
    }

    pub fn with_linear_step(mut self, step: F) -> Self {
        self.linear_step = step;
        self
    }

    pub fn with_min_radius_fraction(mut self, fraction: F) -> Self {
        self.min_radius_fraction = fraction;
        self
    }

    pub fn with_stretchiness(mut self, stretchiness: F) -> Self {
        self.stretchiness = stretchiness;
        self
    }

    pub fn with_resting_distance(mut self, distance: F) -> Self {
        self.resting_distance = distance;
        self
    }

    pub fn with_physics_resolution(mut self, resolution: usize) -> Self {
        self.physics_resolution = resolution;
        self
    }

    pub fn with_sleep_time(mut self, seconds: F) -> Self {
        self.sleep_time = seconds;
        self
    }

    pub fn with_time_offset(mut self, seconds: F) -> Self {
        self.time_offset = seconds;
        self
    }

    pub fn with_align_anchors(mut self, align: bool) -> Self {
        self.align_anchors = align;
        self
    }

    pub fn with_physics(mut self, physics: PhysicsSettings<F>) -> Self {
        self.physics = physics;
        self
    }

    /// Check every field against its valid range.
    ///
    /// Physics chains shorter than two segments are allowed: they simply
    /// never simulate.
    pub fn validate(&self) -> RopeResult<()> {
        if !(self.rope_radius > F::zero()) || !self.rope_radius.is_finite() {
            return Err(RopeError::invalid("rope_radius", "must be positive and finite"));
        }
        if !(self.capsule_radius >= F::zero()) || !self.capsule_radius.is_finite() {
            return Err(RopeError::invalid("capsule_radius", "must be non-negative and finite"));
        }
        if self.rope_resolution < 3 {
            return Err(RopeError::invalid("rope_resolution", "must be at least 3"));
        }
        if self.spherical_resolution < 2 {
            return Err(RopeError::invalid("spherical_resolution", "must be at least 2"));
        }
        if !(self.linear_step > F::zero()) || !self.linear_step.is_finite() {
            return Err(RopeError::invalid("linear_step", "must be positive and finite"));
        }
        if !(self.min_radius_fraction >= F::zero() && self.min_radius_fraction <= F::one()) {
            return Err(RopeError::invalid("min_radius_fraction", "must be in [0, 1]"));
        }
        if !(self.stretchiness >= F::zero()) || !self.stretchiness.is_finite() {
            return Err(RopeError::invalid("stretchiness", "must be non-negative and finite"));
        }
        if !(self.sleep_time >= F::zero()) {
            return Err(RopeError::invalid("sleep_time", "must be non-negative"));
        }
        self.physics.validate()
    }

    /// Tube radius at anchor distance `distance`.
    pub fn stretched_radius(&self, distance: F) -> F {
        let overshoot = (distance - self.resting_distance).max(F::zero());
        let loss = (F::one() - self.min_radius_fraction).min(overshoot * self.stretchiness);
        self.rope_radius * (F::one() - loss)
    }

    /// Straight-run subdivisions at anchor distance `distance`.
    pub fn linear_resolution(&self, distance: F) -> usize {
        (distance / self.linear_step).to_index()
    }
}

impl<F: Float> Default for RopeConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the [`WorkScheduler`](crate::WorkScheduler).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulerConfig<F: Float> {
    /// Number of queues, and of worker threads. Default: 4.
    pub queue_count: usize,
    /// Pending requests a queue holds before evicting its oldest.
    /// Default: 216.
    pub capacity: usize,
    /// Fixed physics step handed to the simulator. Default: 0.02.
    pub fixed_step: F,
}

impl<F: Float> SchedulerConfig<F> {
    pub fn new() -> Self {
        SchedulerConfig {
            queue_count: 4,
            capacity: 216,
            fixed_step: F::from_f32(0.02),
        }
    }

    pub fn with_queue_count(mut self, queue_count: usize) -> Self {
        self.queue_count = queue_count;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_fixed_step(mut self, fixed_step: F) -> Self {
        self.fixed_step = fixed_step;
        self
    }

    pub fn validate(&self) -> RopeResult<()> {
        if self.queue_count == 0 {
            return Err(RopeError::invalid("queue_count", "must be at least 1"));
        }
        if self.capacity == 0 {
            return Err(RopeError::invalid("capacity", "must be at least 1"));
        }
        if !(self.fixed_step > F::zero()) || !self.fixed_step.is_finite() {
            return Err(RopeError::invalid("fixed_step", "must be positive and finite"));
        }
        Ok(())
    }
}

impl<F: Float> Default for SchedulerConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
