//! Single-thread scheduler
//!
//! One dedicated worker runs every task in submission order, each to
//! completion before the next starts. Used with `observe_on` this keeps a
//! stream's events in order.

use rxlite_core::{Scheduler, Task};
use std::fmt;

use crate::config::SchedulerConfig;
use crate::error::SchedulerResult;
use crate::pool::{FixedPool, WorkerPool};

pub struct SingleThreadScheduler {
    pool: FixedPool,
}

impl SingleThreadScheduler {
    pub fn new() -> SchedulerResult<Self> {
        Self::with_config(&SchedulerConfig::default())
    }

    /// The worker is named `{prefix}-single-0`
    pub fn with_config(config: &SchedulerConfig) -> SchedulerResult<Self> {
        config.validate_single()?;
        let name = format!("{}-single", config.thread_name_prefix);
        Ok(Self {
            pool: FixedPool::new(name, 1)?,
        })
    }

    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    pub fn join(&self) {
        self.pool.join();
    }

    pub fn is_shutdown(&self) -> bool {
        self.pool.is_shutdown()
    }

    pub fn is_current_thread(&self) -> bool {
        self.pool.owns_current_thread()
    }
}

impl Scheduler for SingleThreadScheduler {
    fn execute(&self, task: Task) {
        if let Err(error) = self.pool.submit(task) {
            tracing::warn!(%error, "single-thread scheduler dropped task");
        }
    }
}

impl fmt::Debug for SingleThreadScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleThreadScheduler")
            .field("pool", &self.pool)
            .finish()
    }
}
