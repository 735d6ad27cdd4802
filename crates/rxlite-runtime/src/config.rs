//! Scheduler configuration

use rxlite_core::env::{env_get, env_get_str};
use std::time::Duration;

use crate::constants::{
    DEFAULT_IO_KEEP_ALIVE, DEFAULT_THREAD_PREFIX, FALLBACK_COMPUTATION_THREADS,
    MAX_COMPUTATION_THREADS,
};
use crate::error::{SchedulerError, SchedulerResult};

/// Configuration shared by the runtime schedulers
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Number of computation workers (defaults to CPU count)
    pub computation_threads: usize,

    /// Idle time after which an io worker exits (default: 60s)
    pub io_keep_alive: Duration,

    /// Prefix for worker thread names (default: "rx")
    pub thread_name_prefix: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let num_cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(FALLBACK_COMPUTATION_THREADS);

        Self {
            computation_threads: num_cpus.min(MAX_COMPUTATION_THREADS),
            io_keep_alive: DEFAULT_IO_KEEP_ALIVE,
            thread_name_prefix: DEFAULT_THREAD_PREFIX.to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by environment variables
    ///
    /// - `RXLITE_COMPUTATION_THREADS` - computation worker count
    /// - `RXLITE_IO_KEEP_ALIVE_MS` - io keep-alive in milliseconds
    /// - `RXLITE_THREAD_PREFIX` - worker thread name prefix
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let keep_alive_ms = env_get(
            "RXLITE_IO_KEEP_ALIVE_MS",
            defaults.io_keep_alive.as_millis() as u64,
        );

        Self {
            computation_threads: env_get(
                "RXLITE_COMPUTATION_THREADS",
                defaults.computation_threads,
            ),
            io_keep_alive: Duration::from_millis(keep_alive_ms),
            thread_name_prefix: env_get_str("RXLITE_THREAD_PREFIX", &defaults.thread_name_prefix),
        }
    }

    /// Set number of computation workers
    pub fn computation_threads(mut self, n: usize) -> Self {
        self.computation_threads = n;
        self
    }

    /// Set io worker keep-alive
    pub fn io_keep_alive(mut self, d: Duration) -> Self {
        self.io_keep_alive = d;
        self
    }

    /// Set worker thread name prefix
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Validate every field
    pub fn validate(&self) -> SchedulerResult<()> {
        self.validate_computation()?;
        self.validate_io()
    }

    /// Validate the fields the computation scheduler reads
    pub fn validate_computation(&self) -> SchedulerResult<()> {
        if self.computation_threads == 0 {
            return Err(SchedulerError::InvalidConfig(
                "computation_threads must be at least 1",
            ));
        }
        if self.computation_threads > MAX_COMPUTATION_THREADS {
            return Err(SchedulerError::InvalidConfig(
                "computation_threads exceeds maximum",
            ));
        }
        self.validate_prefix()
    }

    /// Validate the fields the io scheduler reads
    pub fn validate_io(&self) -> SchedulerResult<()> {
        if self.io_keep_alive.is_zero() {
            return Err(SchedulerError::InvalidConfig("io_keep_alive must be non-zero"));
        }
        self.validate_prefix()
    }

    /// Validate the fields the single-thread scheduler reads
    pub fn validate_single(&self) -> SchedulerResult<()> {
        self.validate_prefix()
    }

    fn validate_prefix(&self) -> SchedulerResult<()> {
        if self.thread_name_prefix.is_empty() {
            return Err(SchedulerError::InvalidConfig(
                "thread_name_prefix must not be empty",
            ));
        }
        Ok(())
    }
}
