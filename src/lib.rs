//! Procedural capsule rope meshes with Verlet sag, built off-thread.
//!
//! `capsule-rope` sweeps a tube around a capsule outline stretched between
//! two anchors, bends it with a small point-mass rope simulation, and
//! spreads the rebuilds over a bounded set of worker queues so a fixed-rate
//! update loop never waits on geometry.
//!
//! # Features
//!
//! - **Verlet chain**: pinned endpoints, gravity, floor clamp, iterative
//!   rest-length relaxation
//! - **Sag offsets**: chain displacement from the straight line, scaled by
//!   stiffness, blended into the mesh centerline
//! - **Capsule tube mesh**: closed, watertight, with exact vertex and index
//!   counts for any resolution
//! - **Work scheduler**: shortest-queue submission, oldest-first eviction,
//!   one worker per queue
//! - **Rope driver**: stretch-thinned radius, sleeping, single build in
//!   flight, dirty-flag mesh handoff
//! - **Observable**: Monitor physics steps via the `StepObserver` trait
//!
//! # Example
//! ```
//! use capsule_rope::{Anchor, RopeConfig, RopeInstance, SchedulerConfig, Vec3, WorkScheduler};
//!
//! let scheduler = WorkScheduler::new(SchedulerConfig::<f32>::new().with_queue_count(2)).unwrap();
//! let start = Vec3::new(0.0, 1.0, 0.0);
//! let end = Vec3::new(8.0, 1.0, 0.0);
//! let mut rope = RopeInstance::new(RopeConfig::new(), start, end).unwrap();
//!
//! rope.tick(Anchor::at(start), Anchor::at(end), 0.0, &scheduler);
//! scheduler.wait_idle();
//! let mesh = rope.take_mesh().expect("first build finished");
//! assert_eq!(mesh.indices.len(), mesh.vertices.len() * 6);
//! ```

pub mod float;
pub mod vec;
pub mod anchor;
pub mod segment;
pub mod constraint;
pub mod chain;
pub mod solver;
pub mod offsets;
pub mod capsule;
pub mod mesh;
pub mod request;
pub mod scheduler;
pub mod rope;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec3;
pub use anchor::Anchor;
pub use segment::PhysicsSegment;
pub use constraint::{LinkConstraint, PinConstraint};
pub use chain::PhysicsState;
pub use solver::{simulate, simulate_above};
pub use offsets::compute_offsets;
pub use mesh::{generate, MeshBuffers, MeshParams};
pub use request::{BuildCallback, FlightGuard, MeshBuildRequest, SharedPhysics};
pub use scheduler::{SchedulerStats, Submission, WorkScheduler};
pub use rope::{MeshSlot, RopeInstance, TickOutcome};
pub use config::{PhysicsSettings, RopeConfig, SchedulerConfig};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::{RopeError, RopeResult};
