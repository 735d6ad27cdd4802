//! `CachedPool` - unbounded pool that grows on demand.
//!
//! A task goes to an idle worker when one exists, otherwise a new worker is
//! spawned for it. Workers that stay idle for `keep_alive` exit. Queue,
//! idle count and thread count all live under one mutex, so a submitter
//! and a retiring worker can never both miss a queued task.

use parking_lot::{Condvar, Mutex, MutexGuard};
use rxlite_core::Task;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::WorkerPool;
use crate::error::{SchedulerError, SchedulerResult};
use crate::worker::{current_worker, next_pool_id, run_task, spawn_worker, WorkerId};

struct State {
    queue: VecDeque<Task>,
    /// Workers not currently running a task
    idle: usize,
    /// Live workers
    threads: usize,
    next_index: usize,
    shutdown: bool,
}

struct Shared {
    id: usize,
    name: String,
    keep_alive: Duration,
    state: Mutex<State>,
    available: Condvar,
}

pub struct CachedPool {
    shared: Arc<Shared>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl CachedPool {
    /// Create an empty pool; workers are named `{name}-{index}`
    pub fn new(name: impl Into<String>, keep_alive: Duration) -> Self {
        let name = name.into();
        tracing::debug!(pool = %name, ?keep_alive, "cached pool created");
        Self {
            shared: Arc::new(Shared {
                id: next_pool_id(),
                name,
                keep_alive,
                state: Mutex::new(State {
                    queue: VecDeque::new(),
                    idle: 0,
                    threads: 0,
                    next_index: 0,
                    shutdown: false,
                }),
                available: Condvar::new(),
            }),
            handles: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Workers currently waiting for a task
    pub fn idle_count(&self) -> usize {
        self.shared.state.lock().idle
    }

    fn spawn(&self, state: &mut State) -> SchedulerResult<JoinHandle<()>> {
        let index = state.next_index;
        let shared = Arc::clone(&self.shared);
        let handle = spawn_worker(
            format!("{}-{}", self.shared.name, index),
            WorkerId {
                pool: self.shared.id,
                index,
            },
            move || worker_loop(shared),
        )?;
        state.next_index += 1;
        // The new worker is idle until it takes its first task.
        state.threads += 1;
        state.idle += 1;
        Ok(handle)
    }
}

impl WorkerPool for CachedPool {
    fn submit(&self, task: Task) -> SchedulerResult<()> {
        let mut state = self.shared.state.lock();
        if state.shutdown {
            return Err(SchedulerError::Shutdown(self.shared.name.clone()));
        }
        state.queue.push_back(task);

        if state.queue.len() <= state.idle {
            self.shared.available.notify_one();
            return Ok(());
        }

        match self.spawn(&mut state) {
            Ok(handle) => {
                drop(state);
                let mut handles = self.handles.lock();
                handles.retain(|h| !h.is_finished());
                handles.push(handle);
                Ok(())
            }
            Err(error) if state.threads > 0 => {
                // A busy worker will still get to it.
                tracing::warn!(pool = %self.shared.name, %error, "could not grow pool");
                Ok(())
            }
            Err(error) => {
                state.queue.pop_back();
                Err(error)
            }
        }
    }

    fn shutdown(&self) {
        let mut state = self.shared.state.lock();
        if !state.shutdown {
            state.shutdown = true;
            self.shared.available.notify_all();
            tracing::debug!(pool = %self.shared.name, "cached pool shutting down");
        }
    }

    fn join(&self) {
        self.shutdown();
        let handles = std::mem::take(&mut *self.handles.lock());
        let me = thread::current().id();
        for handle in handles {
            if handle.thread().id() == me {
                tracing::warn!(pool = %self.shared.name, "join called from own worker, skipping it");
                continue;
            }
            if handle.join().is_err() {
                tracing::error!(pool = %self.shared.name, "worker thread panicked");
            }
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shared.state.lock().shutdown
    }

    fn thread_count(&self) -> usize {
        self.shared.state.lock().threads
    }

    fn owns_current_thread(&self) -> bool {
        current_worker().map_or(false, |w| w.pool == self.shared.id)
    }
}

fn worker_loop(shared: Arc<Shared>) {
    let mut state = shared.state.lock();
    loop {
        if let Some(task) = state.queue.pop_front() {
            state.idle -= 1;
            MutexGuard::unlocked(&mut state, || run_task(task));
            state.idle += 1;
            continue;
        }
        if state.shutdown {
            break;
        }
        let timed_out = shared
            .available
            .wait_for(&mut state, shared.keep_alive)
            .timed_out();
        if timed_out && state.queue.is_empty() && !state.shutdown {
            tracing::trace!(pool = %shared.name, "idle worker retiring");
            break;
        }
    }
    state.idle -= 1;
    state.threads -= 1;
}

impl Drop for CachedPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for CachedPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("CachedPool")
            .field("name", &self.shared.name)
            .field("threads", &state.threads)
            .field("idle", &state.idle)
            .field("queued", &state.queue.len())
            .field("shutdown", &state.shutdown)
            .finish()
    }
}
