//! # rxlite - minimal reactive streams
//!
//! Push-based, cold observables with a handful of operators and
//! thread-pool schedulers.
//!
//! ## Features
//!
//! - **Cold observables**: nothing runs until `subscribe`, every subscription
//!   re-runs the emission function
//! - **Operators**: `map`, `filter`, `flat_map` and their fallible `try_*` forms
//! - **Scheduling**: `subscribe_on` moves emission to a scheduler,
//!   `observe_on` moves delivery
//! - **Schedulers**: computation (one thread per CPU), io (grows on demand),
//!   single (one thread, FIFO)
//!
//! ## Quick Start
//!
//! ```ignore
//! use rxlite::{computation, observer_fn, single, Observable};
//!
//! fn main() -> Result<(), rxlite::SchedulerError> {
//!     rxlite::init_logging();
//!
//!     Observable::from_iter(1..=10)
//!         .map(|x| x * x)
//!         .filter(|x| x % 2 == 0)
//!         .subscribe_on(computation()?)
//!         .observe_on(single()?)
//!         .subscribe(observer_fn(
//!             |x: i32| println!("next {}", x),
//!             |e| eprintln!("error {}", e),
//!             || println!("done"),
//!         ));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        User Code                            │
//! │        create / from_iter, operators, subscribe             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    rxlite-core                              │
//! │   Observable, Observer, decorators, Scheduler trait         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ Scheduler::execute(task)
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//!    ┌───────────┐      ┌───────────┐      ┌───────────┐
//!    │Computation│      │    IO     │      │  Single   │
//!    │ FixedPool │      │CachedPool │      │ FixedPool │
//!    │  N = CPUs │      │ unbounded │      │   N = 1   │
//!    └───────────┘      └───────────┘      └───────────┘
//!                     rxlite-runtime
//! ```

// Re-export core types
pub use rxlite_core::{
    env_get, env_get_str, observer_fn, ops, FnObserver, Notification, Observable, Observer,
    OnSubscribe, Operator, Recorded, Scheduler, SharedObserver, SharedScheduler, StreamError,
    Task, TestObserver,
};

// Re-export runtime
pub use rxlite_runtime::{
    computation, current_worker, io, single, CachedPool, ComputationScheduler, FixedPool,
    IoScheduler, SchedulerConfig, SchedulerError, SchedulerResult, SingleThreadScheduler,
    WorkerId, WorkerPool,
};

pub use rxlite_runtime::constants;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a `tracing` subscriber writing to stderr
///
/// The filter comes from `RXLITE_LOG`, then `RUST_LOG`, then defaults to
/// `info`. Returns `false` and leaves the existing subscriber in place if a
/// global one is already set.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_env("RXLITE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let directives = filter.to_string();

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(filter = %directives, "logging initialized");
    } else {
        tracing::trace!("global subscriber already set, keeping it");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc};
    use std::thread;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn config(prefix: &str) -> SchedulerConfig {
        SchedulerConfig::new()
            .computation_threads(2)
            .thread_name_prefix(prefix)
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        assert!(!init_logging());
    }

    #[test]
    fn test_map_filter_pipeline() {
        let observer = Arc::new(TestObserver::new());

        Observable::from_iter(1..=10)
            .map(|x| x * 3)
            .filter(|x| x % 2 == 0)
            .subscribe(observer.clone());

        assert_eq!(observer.values(), vec![6, 12, 18, 24, 30]);
        assert_eq!(observer.completions(), 1);
    }

    #[test]
    fn test_subscribe_on_returns_before_emission() {
        let scheduler = Arc::new(ComputationScheduler::with_config(&config("e2e-sub")).unwrap());
        let (go_tx, go_rx) = mpsc::channel::<()>();
        let go_rx = Arc::new(Mutex::new(go_rx));
        let observer = Arc::new(TestObserver::new());

        Observable::<i32>::create(move |observer| {
            // Blocks until the test thread has returned from subscribe.
            go_rx.lock().recv_timeout(WAIT).unwrap();
            observer.on_next(1);
            observer.on_complete();
        })
        .subscribe_on(scheduler.clone())
        .subscribe(observer.clone());

        assert_eq!(observer.event_count(), 0);
        go_tx.send(()).unwrap();

        assert!(observer.await_terminal(WAIT));
        let caller = thread::current().id();
        for recorded in observer.recorded() {
            assert_ne!(recorded.thread_id, caller);
            let name = recorded.thread_name.unwrap();
            assert!(name.starts_with("e2e-sub-computation-"), "ran on {}", name);
        }
    }

    #[test]
    fn test_observe_on_single_keeps_order() {
        let scheduler = Arc::new(SingleThreadScheduler::with_config(&config("e2e-obs")).unwrap());
        let observer = Arc::new(TestObserver::new());

        Observable::from_iter(0..200)
            .map(|x| x + 1)
            .observe_on(scheduler.clone())
            .subscribe(observer.clone());

        assert!(observer.await_terminal(WAIT));
        assert_eq!(observer.values(), (1..=200).collect::<Vec<_>>());
        for name in observer.thread_names() {
            assert_eq!(name.as_deref(), Some("e2e-obs-single-0"));
        }
    }

    #[test]
    fn test_subscribe_on_io_observe_on_single() {
        let io = Arc::new(IoScheduler::with_config(&config("e2e-mix")).unwrap());
        let single = Arc::new(SingleThreadScheduler::with_config(&config("e2e-mix")).unwrap());
        let emitter = Arc::new(Mutex::new(None));
        let observer = Arc::new(TestObserver::new());

        let e = emitter.clone();
        Observable::<&'static str>::create(move |observer| {
            *e.lock() = thread::current().name().map(str::to_owned);
            observer.on_next("a");
            observer.on_next("b");
            observer.on_complete();
        })
        .subscribe_on(io.clone())
        .observe_on(single.clone())
        .subscribe(observer.clone());

        assert!(observer.await_terminal(WAIT));
        assert_eq!(emitter.lock().as_deref(), Some("e2e-mix-io-0"));
        assert_eq!(observer.values(), vec!["a", "b"]);
        for name in observer.thread_names() {
            assert_eq!(name.as_deref(), Some("e2e-mix-single-0"));
        }
    }

    #[test]
    fn test_flat_map_on_computation() {
        let scheduler = Arc::new(ComputationScheduler::with_config(&config("e2e-flat")).unwrap());
        let observer = Arc::new(TestObserver::new());

        Observable::from_iter(vec![1, 2, 3])
            .flat_map(|n: i32| Observable::from_iter(vec![n * 10, n * 10 + 1]))
            .subscribe_on(scheduler.clone())
            .subscribe(observer.clone());

        assert!(observer.await_terminal(WAIT));
        assert_eq!(observer.values(), vec![10, 11, 20, 21, 30, 31]);
    }

    #[test]
    fn test_operator_panic_on_scheduler() {
        let scheduler = Arc::new(SingleThreadScheduler::with_config(&config("e2e-panic")).unwrap());
        let observer = Arc::new(TestObserver::new());

        Observable::from_iter(vec![1, 2, 3])
            .map(|x: i32| {
                assert!(x < 2, "too big");
                x
            })
            .subscribe_on(scheduler.clone())
            .subscribe(observer.clone());

        assert!(observer.await_terminal(WAIT));
        assert_eq!(observer.values(), vec![1]);
        assert_eq!(observer.errors()[0].operator(), Some(Operator::Map));

        // The worker survived and still runs tasks.
        let hits = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();
        let h = hits.clone();
        scheduler.execute(Box::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
            tx.send(()).unwrap();
        }));
        rx.recv_timeout(WAIT).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_schedulers_in_pipeline() {
        let observer = Arc::new(TestObserver::new());

        Observable::from_iter(vec![5, 6])
            .subscribe_on(io().unwrap())
            .observe_on(single().unwrap())
            .subscribe(observer.clone());

        assert!(observer.await_terminal(WAIT));
        assert_eq!(observer.values(), vec![5, 6]);
    }
}
