//! Worker pools backing the schedulers
//!
//! # Implementations
//! - `FixedPool` - N threads started up front, shared FIFO channel
//! - `CachedPool` - threads created on demand, idle ones reused and retired
//!   after a keep-alive period
//!
//! Shutdown is cooperative: a shut-down pool rejects new tasks, lets its
//! workers drain what is already queued and then lets them exit. Dropping a
//! pool shuts it down without waiting for the workers.

mod cached;
mod fixed;

pub use cached::CachedPool;
pub use fixed::FixedPool;

use rxlite_core::Task;

use crate::error::SchedulerResult;

/// A set of worker threads executing submitted tasks
pub trait WorkerPool: Send + Sync {
    /// Queue `task` for execution. Returns immediately.
    ///
    /// Fails with `SchedulerError::Shutdown` once the pool was shut down.
    fn submit(&self, task: Task) -> SchedulerResult<()>;

    /// Stop accepting tasks. Queued tasks still run.
    fn shutdown(&self);

    /// Shut down, then wait for every worker to exit
    ///
    /// A worker calling this skips waiting on itself.
    fn join(&self);

    fn is_shutdown(&self) -> bool;

    /// Number of live worker threads
    fn thread_count(&self) -> usize;

    /// Whether the calling thread is one of this pool's workers
    fn owns_current_thread(&self) -> bool;
}
