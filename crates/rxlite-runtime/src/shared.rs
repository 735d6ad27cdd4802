//! Process-wide scheduler instances
//!
//! Created on first use from [`SchedulerConfig::from_env`] and kept for the
//! life of the process. Every call returns a handle to the same instance.

use std::sync::{Arc, OnceLock};

use crate::computation::ComputationScheduler;
use crate::config::SchedulerConfig;
use crate::error::SchedulerResult;
use crate::io::IoScheduler;
use crate::single::SingleThreadScheduler;

static COMPUTATION: OnceLock<Arc<ComputationScheduler>> = OnceLock::new();
static IO: OnceLock<Arc<IoScheduler>> = OnceLock::new();
static SINGLE: OnceLock<Arc<SingleThreadScheduler>> = OnceLock::new();

fn get_or_create<S, F>(cell: &'static OnceLock<Arc<S>>, create: F) -> SchedulerResult<Arc<S>>
where
    F: FnOnce() -> SchedulerResult<S>,
{
    if let Some(existing) = cell.get() {
        return Ok(Arc::clone(existing));
    }
    let created = Arc::new(create()?);
    // Losing a creation race drops `created`, which shuts its pool down.
    Ok(Arc::clone(cell.get_or_init(|| created)))
}

/// Shared computation scheduler
pub fn computation() -> SchedulerResult<Arc<ComputationScheduler>> {
    get_or_create(&COMPUTATION, || {
        ComputationScheduler::with_config(&SchedulerConfig::from_env())
    })
}

/// Shared io scheduler
pub fn io() -> SchedulerResult<Arc<IoScheduler>> {
    get_or_create(&IO, || IoScheduler::with_config(&SchedulerConfig::from_env()))
}

/// Shared single-thread scheduler
pub fn single() -> SchedulerResult<Arc<SingleThreadScheduler>> {
    get_or_create(&SINGLE, || {
        SingleThreadScheduler::with_config(&SchedulerConfig::from_env())
    })
}
