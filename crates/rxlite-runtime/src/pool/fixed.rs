//! `FixedPool` - N worker threads over one FIFO channel.
//!
//! All workers pull from a shared unbounded crossbeam channel, so tasks
//! start in submission order. With a single worker they also finish in
//! submission order, which is what the single-thread scheduler relies on.

use crossbeam_channel::Sender;
use parking_lot::{Mutex, RwLock};
use rxlite_core::Task;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::WorkerPool;
use crate::error::{SchedulerError, SchedulerResult};
use crate::worker::{current_worker, next_pool_id, run_task, spawn_worker, WorkerId};

pub struct FixedPool {
    id: usize,
    name: String,
    size: usize,
    /// Workers whose loop has not yet returned
    live: Arc<AtomicUsize>,
    /// Dropping the sender disconnects the channel and ends the workers
    sender: RwLock<Option<Sender<Task>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl FixedPool {
    /// Start `size` workers named `{name}-{index}`
    pub fn new(name: impl Into<String>, size: usize) -> SchedulerResult<Self> {
        if size == 0 {
            return Err(SchedulerError::InvalidConfig("pool size must be at least 1"));
        }
        let name = name.into();
        let id = next_pool_id();
        let (sender, receiver) = crossbeam_channel::unbounded::<Task>();
        let live = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(size);
        for index in 0..size {
            let receiver = receiver.clone();
            // Counted before the spawn so `thread_count` is exact on return.
            // A failed spawn drops the closure and with it the guard.
            let guard = LiveGuard::enter(&live);
            // On failure the early return drops `sender`, which stops the
            // workers started so far.
            let handle = spawn_worker(
                format!("{}-{}", name, index),
                WorkerId { pool: id, index },
                move || {
                    let _guard = guard;
                    for task in receiver.iter() {
                        run_task(task);
                    }
                },
            )?;
            handles.push(handle);
        }

        tracing::debug!(pool = %name, workers = size, "fixed pool started");

        Ok(Self {
            id,
            name,
            size,
            live,
            sender: RwLock::new(Some(sender)),
            handles: Mutex::new(handles),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of workers the pool was started with
    pub fn size(&self) -> usize {
        self.size
    }
}

struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn enter(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(live))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl WorkerPool for FixedPool {
    fn submit(&self, task: Task) -> SchedulerResult<()> {
        match self.sender.read().as_ref() {
            Some(sender) => sender
                .send(task)
                .map_err(|_| SchedulerError::Shutdown(self.name.clone())),
            None => Err(SchedulerError::Shutdown(self.name.clone())),
        }
    }

    fn shutdown(&self) {
        if self.sender.write().take().is_some() {
            tracing::debug!(pool = %self.name, "fixed pool shutting down");
        }
    }

    fn join(&self) {
        self.shutdown();
        let handles = std::mem::take(&mut *self.handles.lock());
        let me = thread::current().id();
        for handle in handles {
            if handle.thread().id() == me {
                tracing::warn!(pool = %self.name, "join called from own worker, skipping it");
                continue;
            }
            if handle.join().is_err() {
                tracing::error!(pool = %self.name, "worker thread panicked");
            }
        }
    }

    fn is_shutdown(&self) -> bool {
        self.sender.read().is_none()
    }

    fn thread_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn owns_current_thread(&self) -> bool {
        current_worker().map_or(false, |w| w.pool == self.id)
    }
}

impl Drop for FixedPool {
    fn drop(&mut self) {
        // Workers exit once the queue drains; never block in drop.
        self.shutdown();
    }
}

impl fmt::Debug for FixedPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedPool")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("live", &self.thread_count())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            FixedPool::new("empty", 0),
            Err(SchedulerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_runs_on_named_workers() {
        let pool = FixedPool::new("fixed-test", 3).unwrap();
        let (tx, rx) = mpsc::channel();

        for _ in 0..30 {
            let tx = tx.clone();
            pool.submit(Box::new(move || {
                let name = thread::current().name().map(str::to_owned);
                tx.send(name).unwrap();
            }))
            .unwrap();
        }

        let mut names = HashSet::new();
        for _ in 0..30 {
            let name = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
            assert!(name.starts_with("fixed-test-"), "unexpected worker {}", name);
            names.insert(name);
        }
        assert!(names.len() <= 3);
        assert_eq!(pool.thread_count(), 3);
    }

    #[test]
    fn test_thread_count_drops_after_join() {
        let pool = FixedPool::new("count", 2).unwrap();
        assert_eq!(pool.thread_count(), 2);
        assert_eq!(pool.size(), 2);

        pool.join();
        assert_eq!(pool.thread_count(), 0);
        assert_eq!(pool.size(), 2);
    }

    #[test]
    fn test_single_worker_is_fifo() {
        let pool = FixedPool::new("fifo", 1).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..100 {
            let seen = seen.clone();
            pool.submit(Box::new(move || seen.lock().push(i))).unwrap();
        }
        pool.shutdown();
        pool.join();

        assert_eq!(*seen.lock(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_shutdown_drains_then_rejects() {
        let pool = FixedPool::new("drain", 2).unwrap();
        let count = Arc::new(Mutex::new(0));

        for _ in 0..10 {
            let count = count.clone();
            pool.submit(Box::new(move || {
                thread::sleep(Duration::from_millis(1));
                *count.lock() += 1;
            }))
            .unwrap();
        }
        pool.shutdown();
        assert!(pool.is_shutdown());
        assert!(matches!(
            pool.submit(Box::new(|| {})),
            Err(SchedulerError::Shutdown(_))
        ));

        pool.join();
        assert_eq!(*count.lock(), 10);
    }

    #[test]
    fn test_panic_keeps_worker_alive() {
        let pool = FixedPool::new("panicky", 1).unwrap();
        let (tx, rx) = mpsc::channel();

        pool.submit(Box::new(|| panic!("bad task"))).unwrap();
        pool.submit(Box::new(move || tx.send(42).unwrap())).unwrap();

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
    }

    #[test]
    fn test_owns_current_thread() {
        let pool = Arc::new(FixedPool::new("owner", 1).unwrap());
        assert!(!pool.owns_current_thread());

        let (tx, rx) = mpsc::channel();
        let p = pool.clone();
        pool.submit(Box::new(move || tx.send(p.owns_current_thread()).unwrap()))
            .unwrap();
        assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap());
    }
}
