//! Bounded multi-queue scheduler that spreads mesh builds over workers.
//!
//! Requests land on the shortest queue. Each queue is drained by at most one
//! pool task at a time; a queue's claim flag moves idle -> draining when
//! [`WorkScheduler::dispatch`] hands it to a worker and back to idle once
//! the worker finds it empty. Queue locks are held for a single push or pop,
//! never across a build.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, error, info, trace};

use crate::config::SchedulerConfig;
use crate::error::RopeResult;
use crate::float::Float;
use crate::request::MeshBuildRequest;

/// Where a submitted request went.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    /// Index of the queue the request was appended to.
    pub queue: usize,
    /// Whether the queue was full and its oldest request was dropped.
    pub evicted: bool,
}

/// Counters since the scheduler was created.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub submitted: u64,
    pub evicted: u64,
    pub completed: u64,
}

struct WorkQueue<F: Float> {
    pending: Mutex<VecDeque<MeshBuildRequest<F>>>,
    draining: AtomicBool,
}

struct Shared<F: Float> {
    queues: Vec<WorkQueue<F>>,
    capacity: usize,
    fixed_step: F,
    submitted: AtomicU64,
    evicted: AtomicU64,
    completed: AtomicU64,
    /// Signalled whenever a claim is released or a request lands, for
    /// [`WorkScheduler::wait_idle`].
    progress: (Mutex<()>, Condvar),
}

/// Releases a queue's claim when the draining task ends, unwinding included.
struct ClaimRelease<'a, F: Float> {
    shared: &'a Shared<F>,
    index: usize,
}

impl<F: Float> Drop for ClaimRelease<'_, F> {
    fn drop(&mut self) {
        self.shared.queues[self.index].draining.store(false, Ordering::Release);
        self.shared.notify_progress();
    }
}

/// Spreads [`MeshBuildRequest`]s over a fixed set of bounded queues, one
/// worker thread per queue.
///
/// Create one per host and hand a reference to every rope. Completion
/// callbacks run on the worker threads.
pub struct WorkScheduler<F: Float> {
    shared: Arc<Shared<F>>,
    pool: ThreadPool,
}

impl<F: Float> WorkScheduler<F> {
    pub fn new(config: SchedulerConfig<F>) -> RopeResult<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.queue_count)
            .thread_name(|i| format!("rope-worker-{i}"))
            .panic_handler(|payload| {
                let message = payload
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                    .unwrap_or("non-string panic payload");
                error!(panic = message, "mesh build panicked");
            })
            .build()?;
        let queues = (0..config.queue_count)
            .map(|_| WorkQueue {
                pending: Mutex::new(VecDeque::with_capacity(config.capacity)),
                draining: AtomicBool::new(false),
            })
            .collect();
        info!(
            queues = config.queue_count,
            capacity = config.capacity,
            fixed_step = config.fixed_step.to_f64(),
            "rope scheduler started"
        );
        Ok(WorkScheduler {
            shared: Arc::new(Shared {
                queues,
                capacity: config.capacity,
                fixed_step: config.fixed_step,
                submitted: AtomicU64::new(0),
                evicted: AtomicU64::new(0),
                completed: AtomicU64::new(0),
                progress: (Mutex::new(()), Condvar::new()),
            }),
            pool,
        })
    }

    /// Append `request` to the shortest queue, lowest index on ties.
    ///
    /// A full queue drops its oldest pending request first; that request's
    /// callback never runs. Never waits on a build.
    pub fn submit(&self, request: MeshBuildRequest<F>) -> Submission {
        let shared = &self.shared;
        let mut queue = 0;
        let mut shortest = usize::MAX;
        for (i, q) in shared.queues.iter().enumerate() {
            let len = q.pending.lock().len();
            if len < shortest {
                shortest = len;
                queue = i;
            }
        }

        let evicted = {
            let mut pending = shared.queues[queue].pending.lock();
            let evicted = pending.len() >= shared.capacity && pending.pop_front().is_some();
            pending.push_back(request);
            evicted
        };

        shared.submitted.fetch_add(1, Ordering::Relaxed);
        if evicted {
            shared.evicted.fetch_add(1, Ordering::Relaxed);
            debug!(queue, capacity = shared.capacity, "queue full, evicted oldest request");
        }
        shared.notify_progress();
        Submission { queue, evicted }
    }

    /// Hand every non-empty, unclaimed queue to a worker. Call once per
    /// scheduling tick.
    pub fn dispatch(&self) {
        for (index, q) in self.shared.queues.iter().enumerate() {
            if q.pending.lock().is_empty() {
                continue;
            }
            if q.draining
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                continue;
            }
            trace!(queue = index, "dispatching queue");
            let shared = Arc::clone(&self.shared);
            self.pool.spawn(move || shared.drain(index));
        }
    }

    /// Pending request count per queue.
    pub fn queue_lens(&self) -> Vec<usize> {
        self.shared.queues.iter().map(|q| q.pending.lock().len()).collect()
    }

    /// Whether every queue is empty and no worker holds a claim.
    pub fn is_idle(&self) -> bool {
        self.shared
            .queues
            .iter()
            .all(|q| !q.draining.load(Ordering::Acquire) && q.pending.lock().is_empty())
    }

    /// Keep dispatching until every queue is empty and released.
    ///
    /// Sleeps on a condition variable between dispatches; workers signal it
    /// as they release their queues. Blocks the caller, so it is meant for
    /// shutdown and tests, not the tick loop.
    pub fn wait_idle(&self) {
        let (lock, signal) = &self.shared.progress;
        loop {
            self.dispatch();
            let mut guard = lock.lock();
            if self.is_idle() {
                return;
            }
            signal.wait(&mut guard);
        }
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            submitted: self.shared.submitted.load(Ordering::Relaxed),
            evicted: self.shared.evicted.load(Ordering::Relaxed),
            completed: self.shared.completed.load(Ordering::Relaxed),
        }
    }

    pub fn queue_count(&self) -> usize {
        self.shared.queues.len()
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }
}

impl<F: Float> Shared<F> {
    fn drain(&self, index: usize) {
        let _release = ClaimRelease { shared: self, index };
        let q = &self.queues[index];
        loop {
            let next = q.pending.lock().pop_front();
            match next {
                Some(request) => {
                    request.process(self.fixed_step);
                    self.completed.fetch_add(1, Ordering::Relaxed);
                }
                None => break,
            }
        }
        trace!(queue = index, "queue drained");
    }

    /// Wake [`WorkScheduler::wait_idle`]. Taking the lock orders this after
    /// any waiter's idle check, so no wakeup is lost.
    fn notify_progress(&self) {
        let (lock, signal) = &self.progress;
        let _guard = lock.lock();
        signal.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::chain::PhysicsState;
    use crate::config::PhysicsSettings;
    use crate::mesh::MeshParams;
    use crate::vec::Vec3;

    fn request() -> MeshBuildRequest<f32> {
        let params = MeshParams {
            start: Anchor::at(Vec3::new(0.0, 1.0, 0.0)),
            end: Anchor::at(Vec3::new(2.0, 1.0, 0.0)),
            rope_radius: 0.1,
            capsule_radius: 0.5,
            rope_resolution: 4,
            spherical_resolution: 4,
            linear_resolution: 2,
            min_height: 0.1,
        };
        let physics = Arc::new(Mutex::new(PhysicsState::new(
            params.start.position,
            params.end.position,
            5,
            PhysicsSettings::new(),
        )));
        MeshBuildRequest::new(params, physics, |_| {})
    }

    #[test]
    fn shortest_queue_with_lowest_index_tiebreak() {
        let scheduler = WorkScheduler::new(SchedulerConfig::<f32>::new().with_queue_count(3)).unwrap();
        let picked: Vec<usize> = (0..5).map(|_| scheduler.submit(request()).queue).collect();
        assert_eq!(picked, vec![0, 1, 2, 0, 1]);
        assert_eq!(scheduler.queue_lens(), vec![2, 2, 1]);
    }

    #[test]
    fn eviction_keeps_queue_at_capacity() {
        let scheduler = WorkScheduler::new(
            SchedulerConfig::<f32>::new().with_queue_count(1).with_capacity(2),
        )
        .unwrap();
        assert!(!scheduler.submit(request()).evicted);
        assert!(!scheduler.submit(request()).evicted);
        assert!(scheduler.submit(request()).evicted);
        assert_eq!(scheduler.queue_lens(), vec![2]);
        assert_eq!(scheduler.stats().evicted, 1);
    }

    #[test]
    fn rejects_zero_queues() {
        assert!(WorkScheduler::new(SchedulerConfig::<f32>::new().with_queue_count(0)).is_err());
    }

    #[test]
    fn wait_idle_drains_everything() {
        let scheduler = WorkScheduler::new(SchedulerConfig::<f32>::new().with_queue_count(2)).unwrap();
        for _ in 0..10 {
            scheduler.submit(request());
        }
        scheduler.wait_idle();
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.stats().completed, 10);
    }
}
