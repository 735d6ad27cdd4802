//! Computation scheduler
//!
//! A fixed pool with one worker per CPU, meant for CPU-bound work. Tasks
//! are started in submission order but may finish in any order since
//! several workers run them concurrently.

use rxlite_core::{Scheduler, Task};
use std::fmt;

use crate::config::SchedulerConfig;
use crate::error::SchedulerResult;
use crate::pool::{FixedPool, WorkerPool};

pub struct ComputationScheduler {
    pool: FixedPool,
}

impl ComputationScheduler {
    /// Scheduler with the default configuration
    pub fn new() -> SchedulerResult<Self> {
        Self::with_config(&SchedulerConfig::default())
    }

    /// Workers are named `{prefix}-computation-{index}`
    pub fn with_config(config: &SchedulerConfig) -> SchedulerResult<Self> {
        config.validate_computation()?;
        let name = format!("{}-computation", config.thread_name_prefix);
        let pool = FixedPool::new(name, config.computation_threads)?;
        Ok(Self { pool })
    }

    pub fn thread_count(&self) -> usize {
        self.pool.thread_count()
    }

    /// Stop accepting tasks; already queued ones still run
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    /// Shut down and wait for the workers to exit
    pub fn join(&self) {
        self.pool.join();
    }

    pub fn is_shutdown(&self) -> bool {
        self.pool.is_shutdown()
    }

    /// Whether the caller is running on one of this scheduler's workers
    pub fn is_current_thread(&self) -> bool {
        self.pool.owns_current_thread()
    }
}

impl Scheduler for ComputationScheduler {
    fn execute(&self, task: Task) {
        if let Err(error) = self.pool.submit(task) {
            tracing::warn!(%error, "computation scheduler dropped task");
        }
    }
}

impl fmt::Debug for ComputationScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputationScheduler")
            .field("pool", &self.pool)
            .finish()
    }
}
