//! Worker thread management
//!
//! Every pool thread is spawned through [`spawn_worker`], which names the
//! thread and records which pool it belongs to in a thread-local. Schedulers
//! use that to answer "am I running on one of my own workers?".

use rxlite_core::{panic_message, Task};
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crate::error::{SchedulerError, SchedulerResult};

static NEXT_POOL_ID: AtomicUsize = AtomicUsize::new(1);

/// Allocate a process-unique pool id
pub(crate) fn next_pool_id() -> usize {
    NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Identity of a pool worker thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId {
    /// Pool the worker belongs to
    pub pool: usize,
    /// Index within the pool, also used in the thread name
    pub index: usize,
}

thread_local! {
    static CURRENT_WORKER: Cell<Option<WorkerId>> = const { Cell::new(None) };
}

/// The worker identity of the calling thread, if it is a pool worker
#[inline]
pub fn current_worker() -> Option<WorkerId> {
    CURRENT_WORKER.with(|cell| cell.get())
}

/// Spawn a named worker thread running `body`
pub(crate) fn spawn_worker<F>(name: String, id: WorkerId, body: F) -> SchedulerResult<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(move || {
            CURRENT_WORKER.with(|cell| cell.set(Some(id)));
            tracing::trace!(pool = id.pool, index = id.index, "worker started");
            body();
            tracing::trace!(pool = id.pool, index = id.index, "worker exiting");
        })
        .map_err(|source| SchedulerError::Spawn { name, source })
}

/// Run one task, containing any panic to the task itself
pub(crate) fn run_task(task: Task) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
        tracing::error!(
            thread = thread::current().name().unwrap_or("<unnamed>"),
            panic = %panic_message(&*payload),
            "scheduled task panicked"
        );
    }
}
