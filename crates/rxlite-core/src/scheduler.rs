//! Scheduler contract
//!
//! A scheduler accepts units of work and runs each one exactly once, at some
//! later point, on a thread of its choosing. `execute` never blocks waiting
//! for the task to run.
//!
//! This crate only defines the trait. Thread-backed implementations
//! (computation, io, single) live in `rxlite-runtime`.

use std::sync::Arc;

/// A unit of work submitted to a scheduler
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Executes submitted tasks asynchronously
///
/// Implementations must be shareable across threads: the same scheduler
/// handle is captured by every pipeline that uses it.
pub trait Scheduler: Send + Sync {
    /// Submit `task` for execution and return without waiting for it
    fn execute(&self, task: Task);
}

/// Shared scheduler handle as taken by `subscribe_on` and `observe_on`
pub type SharedScheduler = Arc<dyn Scheduler>;

impl<S> Scheduler for Arc<S>
where
    S: Scheduler + ?Sized,
{
    #[inline]
    fn execute(&self, task: Task) {
        (**self).execute(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::testing::ManualScheduler;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_shared_scheduler_forwards() {
        let manual = Arc::new(ManualScheduler::default());
        let shared: SharedScheduler = manual.clone();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let h = hits.clone();
            shared.execute(Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(manual.run_all(), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
