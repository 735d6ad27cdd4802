//! IO scheduler
//!
//! Backed by a [`CachedPool`]: blocking tasks never wait behind each other
//! because the pool spawns a new worker whenever none is idle.

use rxlite_core::{Scheduler, Task};
use std::fmt;

use crate::config::SchedulerConfig;
use crate::error::SchedulerResult;
use crate::pool::{CachedPool, WorkerPool};

pub struct IoScheduler {
    pool: CachedPool,
}

impl IoScheduler {
    pub fn new() -> SchedulerResult<Self> {
        Self::with_config(&SchedulerConfig::default())
    }

    /// Workers are named `{prefix}-io-{index}` and exit after
    /// `io_keep_alive` without work
    pub fn with_config(config: &SchedulerConfig) -> SchedulerResult<Self> {
        config.validate_io()?;
        let name = format!("{}-io", config.thread_name_prefix);
        Ok(Self {
            pool: CachedPool::new(name, config.io_keep_alive),
        })
    }

    /// Live worker threads, busy or idle
    pub fn thread_count(&self) -> usize {
        self.pool.thread_count()
    }

    pub fn idle_count(&self) -> usize {
        self.pool.idle_count()
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

impl Scheduler for IoScheduler {
    fn execute(&self, task: Task) {
        if let Err(error) = self.pool.submit(task) {
            tracing::warn!(%error, "io scheduler dropped task");
        }
    }
}

impl fmt::Debug for IoScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoScheduler").field("pool", &self.pool).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_blocking_tasks_do_not_starve() {
        let cfg = SchedulerConfig::new().thread_name_prefix("iotest");
        let scheduler = IoScheduler::with_config(&cfg).unwrap();
        let barrier = Arc::new(Barrier::new(9));

        for _ in 0..8 {
            let barrier = barrier.clone();
            scheduler.execute(Box::new(move || {
                barrier.wait();
            }));
        }
        barrier.wait();
        assert!(scheduler.thread_count() >= 8);

        scheduler.shutdown();
        scheduler.join();
        assert_eq!(scheduler.thread_count(), 0);
    }

    #[test]
    fn test_ignores_computation_settings() {
        let cfg = SchedulerConfig::new()
            .computation_threads(0)
            .thread_name_prefix("io-only");
        let scheduler = IoScheduler::with_config(&cfg).unwrap();

        let (tx, rx) = mpsc::channel();
        scheduler.execute(Box::new(move || tx.send(()).unwrap()));
        rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let bad = SchedulerConfig::new().io_keep_alive(Duration::ZERO);
        assert!(IoScheduler::with_config(&bad).is_err());
    }

    #[test]
    fn test_thread_names() {
        let cfg = SchedulerConfig::new().thread_name_prefix("ioname");
        let scheduler = IoScheduler::with_config(&cfg).unwrap();
        let (tx, rx) = mpsc::channel();

        scheduler.execute(Box::new(move || {
            tx.send(thread::current().name().map(str::to_owned)).unwrap();
        }));

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("ioname-io-0"));
    }

    #[test]
    fn test_execute_after_shutdown_is_dropped() {
        let scheduler = IoScheduler::new().unwrap();
        scheduler.shutdown();
        scheduler.execute(Box::new(|| {}));
        assert_eq!(scheduler.thread_count(), 0);
        assert!(scheduler.is_shutdown());
    }
}
