//! # rxlite-runtime
//!
//! Thread-backed [`Scheduler`](rxlite_core::Scheduler) implementations.
//!
//! This crate provides:
//! - `ComputationScheduler` - fixed pool sized to the CPU count
//! - `IoScheduler` - growable pool that reuses idle threads
//! - `SingleThreadScheduler` - one worker, strict FIFO
//! - Lazily created process-wide instances (`computation()`, `io()`, `single()`)
//!
//! Worker threads are named `{prefix}-{kind}-{index}` (default prefix `rx`).
//! A panicking task is logged and does not take its worker down.

pub mod computation;
pub mod config;
pub mod error;
pub mod io;
pub mod pool;
pub mod shared;
pub mod single;
pub mod worker;

// Re-exports
pub use computation::ComputationScheduler;
pub use config::SchedulerConfig;
pub use error::{SchedulerError, SchedulerResult};
pub use io::IoScheduler;
pub use pool::{CachedPool, FixedPool, WorkerPool};
pub use shared::{computation, io, single};
pub use single::SingleThreadScheduler;
pub use worker::{current_worker, WorkerId};

/// Runtime limits and defaults
pub mod constants {
    use std::time::Duration;

    /// Upper bound on computation workers
    pub const MAX_COMPUTATION_THREADS: usize = 1024;

    /// Computation workers when the CPU count cannot be determined
    pub const FALLBACK_COMPUTATION_THREADS: usize = 4;

    /// How long an idle io worker waits for work before exiting
    pub const DEFAULT_IO_KEEP_ALIVE: Duration = Duration::from_secs(60);

    /// Default worker thread name prefix
    pub const DEFAULT_THREAD_PREFIX: &str = "rx";
}
